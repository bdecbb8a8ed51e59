mod support;

use rigpanel_lib::backend::{CellSync, DispatchOutcome, PlaceCommand};
use rigpanel_lib::events::NoticeLevel;
use rigpanel_lib::models::{HookType, OperatingMode, PegCell, PegTool, GRID_COLS, GRID_ROWS};
use rigpanel_lib::pegboard::CellReport;
use serde_json::json;
use support::{enter, harness, BackendCall, Reply};

fn syncs(calls: &[BackendCall]) -> Vec<CellSync> {
    calls
        .iter()
        .filter_map(|call| match call {
            BackendCall::SyncCell(sync) => Some(*sync),
            _ => None,
        })
        .collect()
}

fn places(calls: &[BackendCall]) -> Vec<PlaceCommand> {
    calls
        .iter()
        .filter_map(|call| match call {
            BackendCall::Place(command) => Some(*command),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn paint_then_erase_syncs_twice_and_places_once() {
    let h = harness();
    enter(&h, OperatingMode::Task2AwaitingInput).await;

    h.session.select_peg_tool(PegTool::Hook(HookType::H2)).await;
    let report = h.session.peg_click(3, 4).await.unwrap();
    assert_eq!(
        report,
        CellReport::Updated {
            state: PegCell::Hook(HookType::H2),
            placement: Some(DispatchOutcome::Accepted {
                message: "placing".into()
            }),
        }
    );

    h.session.select_peg_tool(PegTool::Erase).await;
    h.session.peg_click(3, 4).await.unwrap();

    let calls = h.backend.calls();
    assert_eq!(
        syncs(&calls),
        vec![
            CellSync {
                row: 3,
                col: 4,
                state: PegCell::Hook(HookType::H2)
            },
            CellSync {
                row: 3,
                col: 4,
                state: PegCell::Empty
            },
        ]
    );
    assert_eq!(
        places(&calls),
        vec![PlaceCommand {
            row: 3,
            col: 4,
            hook_type: HookType::H2,
            color_id: 1
        }]
    );
    // The sync for a cell goes out before its place command.
    assert!(matches!(calls[0], BackendCall::SyncCell(_)));
    assert!(matches!(calls[1], BackendCall::Place(_)));
}

#[tokio::test]
async fn repainting_the_same_value_is_a_no_op() {
    let h = harness();
    enter(&h, OperatingMode::Task2AwaitingInput).await;

    h.session.peg_click(0, 0).await.unwrap();
    let report = h.session.peg_click(0, 0).await.unwrap();

    assert_eq!(report, CellReport::Unchanged);
    assert_eq!(syncs(&h.backend.calls()).len(), 1);
}

#[tokio::test]
async fn right_click_clears_without_dispatch() {
    let h = harness();
    enter(&h, OperatingMode::Task2AwaitingInput).await;

    assert_eq!(h.session.peg_clear(7, 14).await.unwrap(), CellReport::Unchanged);
    assert!(h.backend.calls().is_empty());

    h.session.select_peg_tool(PegTool::Hook(HookType::H4)).await;
    h.session.peg_click(7, 14).await.unwrap();
    h.session.peg_clear(7, 14).await.unwrap();

    let calls = h.backend.calls();
    assert_eq!(syncs(&calls).len(), 2);
    assert_eq!(places(&calls).len(), 1);
    assert_eq!(h.session.pegboard().view().await.cells[7][14], PegCell::Empty);
}

#[tokio::test]
async fn rejected_place_keeps_marked_cell() {
    let h = harness();
    enter(&h, OperatingMode::Task2AwaitingInput).await;
    h.backend.set_place_reply(Reply::Reject("hole blocked"));

    h.session.select_peg_tool(PegTool::Hook(HookType::H3)).await;
    h.session.peg_click(2, 2).await.unwrap();

    let board = h.session.pegboard().view().await;
    assert_eq!(board.cells[2][2], PegCell::Hook(HookType::H3));
    assert_eq!(h.events.notices(NoticeLevel::Warn), vec!["Place rejected: hole blocked"]);
}

#[tokio::test]
async fn unreachable_arm_keeps_marked_cell() {
    let h = harness();
    enter(&h, OperatingMode::Task2AwaitingInput).await;
    h.backend.set_place_reply(Reply::Unreachable);

    h.session.select_peg_tool(PegTool::Hook(HookType::H1)).await;
    let report = h.session.peg_click(6, 9).await.unwrap();

    assert_eq!(
        report,
        CellReport::Updated {
            state: PegCell::Hook(HookType::H1),
            placement: None,
        }
    );
    assert_eq!(h.session.pegboard().view().await.cells[6][9], PegCell::Hook(HookType::H1));
    assert_eq!(h.events.notices(NoticeLevel::Error).len(), 1);

    // The next click on the same hole still sees the kept value.
    assert_eq!(h.session.peg_click(6, 9).await.unwrap(), CellReport::Unchanged);
}

#[tokio::test]
async fn out_of_range_click_is_an_error() {
    let h = harness();
    enter(&h, OperatingMode::Task2AwaitingInput).await;

    assert!(h.session.peg_click(GRID_ROWS, 0).await.is_err());
    assert!(h.session.peg_clear(0, GRID_COLS).await.is_err());
    assert!(h.backend.calls().is_empty());
}

#[tokio::test]
async fn grid_is_locked_outside_task2_input() {
    let h = harness();

    for mode in [
        OperatingMode::Manual,
        OperatingMode::Task1AwaitingInput,
        OperatingMode::Task2Executing,
    ] {
        enter(&h, mode).await;
        assert!(h.session.peg_click(1, 1).await.is_err());
        assert!(h.session.peg_clear(1, 1).await.is_err());
    }
    assert!(h.backend.calls().is_empty());
}

#[tokio::test]
async fn load_normalizes_legacy_cells() {
    let h = harness();
    let mut rows = vec![json!([]); GRID_ROWS];
    rows[0] = json!([true, 0, "H3", 2, " h4 ", "x", null]);
    rows[5] = json!("not a row");
    *h.backend.board.lock().unwrap() = Some(json!(rows));

    let board = h.session.pegboard().load().await;

    assert_eq!(board.rows, GRID_ROWS);
    assert_eq!(board.cols, GRID_COLS);
    assert_eq!(
        &board.cells[0][..7],
        &[
            PegCell::Hook(HookType::H1),
            PegCell::Empty,
            PegCell::Hook(HookType::H3),
            PegCell::Hook(HookType::H2),
            PegCell::Hook(HookType::H4),
            PegCell::Empty,
            PegCell::Empty,
        ]
    );
    assert!(board.cells[5].iter().all(|cell| *cell == PegCell::Empty));
    assert_eq!(h.events.count("pegboard-loaded"), 1);
}

#[tokio::test]
async fn load_falls_back_to_empty_board() {
    let h = harness();

    // Backend error.
    let board = h.session.pegboard().load().await;
    assert!(board.cells.iter().flatten().all(|cell| *cell == PegCell::Empty));

    // Wrong row count.
    *h.backend.board.lock().unwrap() = Some(json!([[1, 2, 3]]));
    let board = h.session.pegboard().load().await;
    assert_eq!(board.cells.len(), GRID_ROWS);
    assert!(board.cells.iter().flatten().all(|cell| *cell == PegCell::Empty));

    // Not an array at all.
    *h.backend.board.lock().unwrap() = Some(json!({"status": "error"}));
    let board = h.session.pegboard().load().await;
    assert!(board.cells.iter().flatten().all(|cell| *cell == PegCell::Empty));
}

#[tokio::test]
async fn shortcuts_select_tools() {
    let h = harness();

    assert_eq!(
        h.session.select_peg_tool_by_key("3").await,
        Some(PegTool::Hook(HookType::H3))
    );
    assert_eq!(h.session.select_peg_tool_by_key("Backspace").await, Some(PegTool::Erase));
    assert_eq!(h.session.select_peg_tool_by_key("q").await, None);
    assert_eq!(h.session.pegboard().tool().await, PegTool::Erase);
}
