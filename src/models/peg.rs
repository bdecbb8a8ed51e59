use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize, Serializer};

pub const GRID_ROWS: usize = 8;
pub const GRID_COLS: usize = 15;

/// Physical hook part inserted into a pegboard hole during Task 2.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HookType {
    H1,
    H2,
    H3,
    H4,
}

impl HookType {
    pub const ALL: [HookType; 4] = [HookType::H1, HookType::H2, HookType::H3, HookType::H4];

    /// 1-based number printed on the part (`h3` -> 3).
    pub fn number(&self) -> u8 {
        match self {
            HookType::H1 => 1,
            HookType::H2 => 2,
            HookType::H3 => 3,
            HookType::H4 => 4,
        }
    }

    pub fn from_number(number: i64) -> Option<Self> {
        match number {
            1 => Some(HookType::H1),
            2 => Some(HookType::H2),
            3 => Some(HookType::H3),
            4 => Some(HookType::H4),
            _ => None,
        }
    }

    /// The arm firmware addresses hook bins by the same ids as block colors.
    pub fn color_id(&self) -> u8 {
        self.number() - 1
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HookType::H1 => "h1",
            HookType::H2 => "h2",
            HookType::H3 => "h3",
            HookType::H4 => "h4",
        }
    }
}

/// One pegboard hole. On the wire an empty hole is `0` and an occupied one
/// is its hook tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PegCell {
    #[default]
    Empty,
    Hook(HookType),
}

impl PegCell {
    pub fn hook(&self) -> Option<HookType> {
        match self {
            PegCell::Empty => None,
            PegCell::Hook(hook) => Some(*hook),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, PegCell::Empty)
    }
}

impl Serialize for PegCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PegCell::Empty => serializer.serialize_u8(0),
            PegCell::Hook(hook) => serializer.serialize_str(hook.as_str()),
        }
    }
}

/// Active pegboard paint tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PegTool {
    Hook(HookType),
    Erase,
}

impl Default for PegTool {
    fn default() -> Self {
        PegTool::Hook(HookType::H1)
    }
}

impl PegTool {
    /// Keyboard shortcuts: `1`-`4` pick a hook, `0`/Backspace/Delete pick erase.
    pub fn from_shortcut(key: &str) -> Option<Self> {
        match key {
            "0" | "Backspace" | "Delete" => Some(PegTool::Erase),
            "1" => Some(PegTool::Hook(HookType::H1)),
            "2" => Some(PegTool::Hook(HookType::H2)),
            "3" => Some(PegTool::Hook(HookType::H3)),
            "4" => Some(PegTool::Hook(HookType::H4)),
            _ => None,
        }
    }

    /// Cell value a click with this tool produces.
    pub fn paint_value(&self) -> PegCell {
        match self {
            PegTool::Hook(hook) => PegCell::Hook(*hook),
            PegTool::Erase => PegCell::Empty,
        }
    }
}

impl fmt::Display for PegTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PegTool::Hook(hook) => f.write_str(hook.as_str()),
            PegTool::Erase => f.write_str("erase"),
        }
    }
}

impl FromStr for PegTool {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "erase" => Ok(PegTool::Erase),
            "h1" => Ok(PegTool::Hook(HookType::H1)),
            "h2" => Ok(PegTool::Hook(HookType::H2)),
            "h3" => Ok(PegTool::Hook(HookType::H3)),
            "h4" => Ok(PegTool::Hook(HookType::H4)),
            other => Err(anyhow!("unknown pegboard tool '{other}'")),
        }
    }
}

impl TryFrom<String> for PegTool {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PegTool> for String {
    fn from(tool: PegTool) -> Self {
        tool.to_string()
    }
}
