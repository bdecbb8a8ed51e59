use serde::{Deserialize, Serialize};

/// Block colors the vision pipeline can pick out for Task 1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GrabColor {
    Blue,
    Yellow,
    Orange,
    Purple,
}

impl GrabColor {
    pub const ALL: [GrabColor; 4] = [
        GrabColor::Blue,
        GrabColor::Yellow,
        GrabColor::Orange,
        GrabColor::Purple,
    ];

    /// Index the vision pipeline uses for this color.
    pub fn color_id(&self) -> u8 {
        match self {
            GrabColor::Blue => 0,
            GrabColor::Yellow => 1,
            GrabColor::Orange => 2,
            GrabColor::Purple => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GrabColor::Blue => "blue",
            GrabColor::Yellow => "yellow",
            GrabColor::Orange => "orange",
            GrabColor::Purple => "purple",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GrabRequest {
    /// Session-unique, monotonically increasing.
    pub seq: u64,
    pub color: GrabColor,
}
