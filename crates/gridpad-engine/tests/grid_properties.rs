// Property-based tests for grid mutations and the view pipeline.
// Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;

use gridpad_engine::engine::{Grid, SortDirection, ViewState, derive_view};

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

fn arb_value() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => r"[a-zA-Z0-9 ]{0,8}",
        1 => Just(String::new()),
    ]
}

fn arb_grid() -> impl Strategy<Value = Grid> {
    (1usize..6, 1usize..5).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(prop::collection::vec(arb_value(), cols), rows)
            .prop_map(|values| Grid::from_rows(values).0)
    })
}

#[derive(Debug, Clone)]
enum Op {
    InsertRow(usize),
    DeleteRow(usize),
    DuplicateRow(usize),
    InsertColumn(usize),
    DeleteColumn(usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..8).prop_map(Op::InsertRow),
        (0usize..8).prop_map(Op::DeleteRow),
        (0usize..8).prop_map(Op::DuplicateRow),
        (0usize..8).prop_map(Op::InsertColumn),
        (0usize..8).prop_map(Op::DeleteColumn),
    ]
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn last_write_wins(mut grid in arb_grid(), first in arb_value(), second in arb_value()) {
        let mut once = grid.clone();
        grid.set_cell_value(0, 0, &first).unwrap();
        grid.set_cell_value(0, 0, &second).unwrap();
        once.set_cell_value(0, 0, &second).unwrap();
        prop_assert_eq!(grid, once);
    }

    #[test]
    fn shape_invariants_hold(mut grid in arb_grid(), ops in prop::collection::vec(arb_op(), 0..24)) {
        for op in ops {
            let _ = match op {
                Op::InsertRow(at) => grid.insert_row(Some(at)).map(|_| ()),
                Op::DeleteRow(at) => grid.delete_row(at),
                Op::DuplicateRow(at) => grid.duplicate_row(at).map(|_| ()),
                Op::InsertColumn(at) => grid.insert_column(Some(at)).map(|_| ()),
                Op::DeleteColumn(at) => grid.delete_column(at),
            };
            prop_assert!(grid.row_count() >= 1);
            prop_assert!(grid.col_count() >= 1);
            prop_assert_eq!(grid.column_names().len(), grid.col_count());
            prop_assert!(grid.rows().iter().all(|r| r.len() == grid.col_count()));
        }
    }

    #[test]
    fn view_maps_are_inverse(grid in arb_grid(), filter in "[a-c]{0,1}", col in 0usize..4, desc in any::<bool>()) {
        let mut state = ViewState::new();
        state.set_filter(&filter);
        state.toggle_sort(col.min(grid.col_count() - 1));
        if desc {
            state.toggle_sort(col.min(grid.col_count() - 1));
            prop_assert_eq!(state.sort.unwrap().direction, SortDirection::Desc);
        }
        let view = derive_view(&grid, &state);
        for display in 0..view.row_count() {
            let canonical = view.canonical_row(display).unwrap();
            prop_assert_eq!(view.display_row(canonical), Some(display));
        }
        let mut seen: Vec<usize> = view.row_map().to_vec();
        seen.sort_unstable();
        seen.dedup();
        prop_assert_eq!(seen.len(), view.row_count());
    }
}
