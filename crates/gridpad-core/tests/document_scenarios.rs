use gridpad_core::{CellRef, Document, DocumentOptions};
use gridpad_engine::engine::{ColorKey, ToggleAttr};
use pretty_assertions::assert_eq;

fn values(doc: &Document) -> Vec<Vec<String>> {
    doc.grid()
        .rows()
        .iter()
        .map(|r| r.iter().map(|c| c.value.clone()).collect())
        .collect()
}

fn displayed(doc: &Document) -> Vec<Vec<String>> {
    (0..doc.view().row_count())
        .map(|r| {
            (0..doc.view().col_count())
                .map(|c| doc.display_value(r, c).unwrap_or_default().to_string())
                .collect()
        })
        .collect()
}

#[test]
fn sort_format_duplicate_then_undo_twice() {
    let mut doc = Document::with_options(DocumentOptions {
        rows: 2,
        cols: 2,
        ..DocumentOptions::default()
    });
    doc.load_csv_text("b,\na,").unwrap();
    let original = doc.grid().clone();

    doc.toggle_sort(0).unwrap();
    assert_eq!(displayed(&doc), vec![vec!["a", ""], vec!["b", ""]]);

    doc.toggle_format(CellRef::new(0, 0), ToggleAttr::Bold)
        .unwrap();
    assert!(doc.grid().cell(1, 0).unwrap().format.is_bold());

    doc.duplicate_row(0).unwrap();
    assert_eq!(doc.grid().row_count(), 3);

    assert!(doc.undo());
    assert!(doc.undo());
    assert_eq!(doc.grid(), &original);
    assert!(
        doc.grid()
            .rows()
            .iter()
            .flatten()
            .all(|c| c.format.is_empty())
    );
}

#[test]
fn hidden_column_edit_and_free_text_filter() {
    let mut doc = Document::new();
    doc.load_csv_text("id,name,secret\n1,ann,x\n2,bob,y").unwrap();
    doc.toggle_hidden(2).unwrap();
    assert_eq!(doc.view().col_count(), 2);

    doc.set_value(CellRef::new(2, 1), "BOB").unwrap();
    doc.set_color(CellRef::new(2, 1), ColorKey::Text, "#3b82f6")
        .unwrap();
    assert_eq!(values(&doc)[1], vec!["1", "ann", "x"]);
    assert_eq!(values(&doc)[2], vec!["2", "BOB", "y"]);
    assert_eq!(
        doc.grid().cell(2, 1).unwrap().format.color.as_deref(),
        Some("#3b82f6")
    );

    // Free text still searches the hidden column.
    doc.set_filter("y");
    assert_eq!(displayed(&doc), vec![vec!["2", "BOB"]]);
}

#[test]
fn structural_edits_keep_selection_in_bounds() {
    let mut doc = Document::with_options(DocumentOptions {
        rows: 3,
        cols: 3,
        ..DocumentOptions::default()
    });
    doc.set_active(CellRef::new(2, 2));
    doc.delete_last_row().unwrap();
    doc.delete_last_column().unwrap();
    assert_eq!(doc.selection().active, Some(CellRef::new(1, 1)));

    doc.begin_select(CellRef::new(0, 0));
    doc.extend_select(CellRef::new(1, 1));
    doc.release_select();
    doc.delete_row(1).unwrap();
    assert_eq!(doc.selection().range, None);
    assert_eq!(doc.selection().active, Some(CellRef::new(0, 0)));
}

#[test]
fn redo_cleared_by_new_edit() {
    let mut doc = Document::new();
    doc.set_value(CellRef::new(0, 0), "a").unwrap();
    doc.undo();
    assert!(doc.can_redo());
    doc.set_value(CellRef::new(1, 1), "b").unwrap();
    assert!(!doc.can_redo());
}
