//! CSV import/export functionality
//!
//! Export quotes every field, doubles embedded quotes, joins fields with `,` and records
//! with `\n`, with no trailing newline. Formats are not exported.
//!
//! Import is quote-aware across line breaks, so any exported grid decodes back to the same
//! values. Short records are padded with blank cells to the widest record.

use std::path::Path;

use gridpad_engine::Grid;
use tracing::{debug, info};

use crate::error::{GridpadError, Result};

/// File name offered when exporting without an explicit path.
pub const DEFAULT_EXPORT_NAME: &str = "spreadsheet.csv";

/// Options for reading and writing CSV files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CsvOptions {
    /// First record holds column names
    pub has_header: bool,
}

fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn encode_record<'a>(fields: impl Iterator<Item = &'a str>) -> String {
    fields.map(quote_field).collect::<Vec<_>>().join(",")
}

/// Serialize cell values.
pub fn encode(grid: &Grid) -> String {
    grid.rows()
        .iter()
        .map(|row| encode_record(row.iter().map(|c| c.value.as_str())))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serialize with the column names as the first record.
pub fn encode_with_header(grid: &Grid) -> String {
    let header = encode_record(grid.column_names().iter().map(String::as_str));
    format!("{}\n{}", header, encode(grid))
}

/// Split CSV text into records of fields. Completely empty lines are skipped.
pub(crate) fn parse_records(content: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut current = String::new();
    // Record has content beyond an empty line (any char, or a quoted field).
    let mut touched = false;
    let mut in_quotes = false;
    let mut quote_line = 0;
    let mut line = 1;
    let mut chars = content.chars().peekable();

    let mut end_record = |fields: &mut Vec<String>, current: &mut String, touched: &mut bool| {
        fields.push(std::mem::take(current));
        if *touched {
            records.push(std::mem::take(fields));
        } else {
            fields.clear();
        }
        *touched = false;
    };

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    current.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    current.push(c);
                }
                _ => current.push(c),
            }
            continue;
        }
        match c {
            '"' if current.is_empty() => {
                in_quotes = true;
                quote_line = line;
                touched = true;
            }
            ',' => {
                fields.push(std::mem::take(&mut current));
                touched = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                end_record(&mut fields, &mut current, &mut touched);
                line += 1;
            }
            _ => {
                current.push(c);
                touched = true;
            }
        }
    }

    if in_quotes {
        return Err(GridpadError::MalformedInput {
            line: quote_line,
            message: "unterminated quoted field".to_string(),
        });
    }
    end_record(&mut fields, &mut current, &mut touched);
    Ok(records)
}

fn grid_from_records(records: Vec<Vec<String>>) -> Grid {
    let (grid, padded) = Grid::from_rows(records);
    if padded > 0 {
        debug!(padded, width = grid.col_count(), "padded short CSV rows");
    }
    grid
}

/// Parse CSV text into a grid with default column names.
pub fn decode(content: &str) -> Result<Grid> {
    let records = parse_records(content)?;
    if records.is_empty() {
        return Err(GridpadError::EmptyCsv);
    }
    Ok(grid_from_records(records))
}

/// Parse CSV text whose first record holds column names. A header without data yields a
/// single blank row.
pub fn decode_with_header(content: &str) -> Result<Grid> {
    let mut records = parse_records(content)?.into_iter();
    let Some(header) = records.next() else {
        return Err(GridpadError::EmptyCsv);
    };
    let rows: Vec<Vec<String>> = records.collect();
    let data_width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let width = header.len().max(data_width).max(1);

    let rows = if rows.is_empty() {
        vec![vec![String::new(); width]]
    } else {
        rows
    };
    let mut grid = grid_from_records(rows);
    while grid.col_count() < width {
        grid.insert_column(None)?;
    }
    let mut names: Vec<String> = grid.column_names().to_vec();
    for (slot, name) in names.iter_mut().zip(header) {
        *slot = name;
    }
    grid.set_column_names(names)?;
    Ok(grid)
}

pub fn decode_with(content: &str, options: &CsvOptions) -> Result<Grid> {
    if options.has_header {
        decode_with_header(content)
    } else {
        decode(content)
    }
}

pub fn encode_with(grid: &Grid, options: &CsvOptions) -> String {
    if options.has_header {
        encode_with_header(grid)
    } else {
        encode(grid)
    }
}

/// Read a CSV file into a grid.
pub fn read_csv(path: &Path, options: &CsvOptions) -> Result<Grid> {
    let content = std::fs::read_to_string(path)?;
    let grid = decode_with(&content, options)?;
    info!(
        path = %path.display(),
        rows = grid.row_count(),
        cols = grid.col_count(),
        "imported CSV"
    );
    Ok(grid)
}

/// Write a grid's values to a CSV file.
pub fn write_csv(path: &Path, grid: &Grid, options: &CsvOptions) -> Result<()> {
    std::fs::write(path, encode_with(grid, options))?;
    info!(
        path = %path.display(),
        rows = grid.row_count(),
        cols = grid.col_count(),
        "exported CSV"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridpad_engine::engine::FormatAttr;
    use pretty_assertions::assert_eq;

    fn values(grid: &Grid) -> Vec<Vec<String>> {
        grid.rows()
            .iter()
            .map(|r| r.iter().map(|c| c.value.clone()).collect())
            .collect()
    }

    #[test]
    fn test_encode_quotes_everything() {
        let (grid, _) = Grid::from_rows(vec![
            vec!["a".into(), "b,c".into()],
            vec!["say \"hi\"".into(), "".into()],
        ]);
        assert_eq!(encode(&grid), "\"a\",\"b,c\"\n\"say \"\"hi\"\"\",\"\"");
    }

    #[test]
    fn test_encode_drops_formats() {
        let mut grid = Grid::new(1, 1);
        grid.set_cell_value(0, 0, "x").unwrap();
        grid.set_cell_format(0, 0, &FormatAttr::Bold).unwrap();
        assert_eq!(encode(&grid), "\"x\"");
    }

    #[test]
    fn test_decode_round_trips_special_values() {
        let (grid, _) = Grid::from_rows(vec![
            vec!["multi\nline".into(), "a,b".into()],
            vec!["\"quoted\"".into(), "  spaced  ".into()],
        ]);
        let decoded = decode(&encode(&grid)).unwrap();
        assert_eq!(values(&decoded), values(&grid));
    }

    #[test]
    fn test_decode_unquoted_and_crlf() {
        let grid = decode("a,b\r\nc,d\r\n").unwrap();
        assert_eq!(values(&grid), vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn test_decode_skips_blank_lines() {
        let grid = decode("a,b\n\n\nc,d\n\n").unwrap();
        assert_eq!(grid.row_count(), 2);
    }

    #[test]
    fn test_decode_keeps_quoted_empty_line() {
        let grid = decode("\"\"\n\"x\"").unwrap();
        assert_eq!(values(&grid), vec![vec![""], vec!["x"]]);
    }

    #[test]
    fn test_decode_pads_short_rows() {
        let grid = decode("a\nb,c,d\ne,f").unwrap();
        assert_eq!(
            values(&grid),
            vec![vec!["a", "", ""], vec!["b", "c", "d"], vec!["e", "f", ""]]
        );
        assert_eq!(grid.column_names(), &["A", "B", "C"]);
    }

    #[test]
    fn test_decode_stray_after_closing_quote_is_literal() {
        let grid = decode("\"ab\"cd,e").unwrap();
        assert_eq!(values(&grid), vec![vec!["abcd", "e"]]);
    }

    #[test]
    fn test_decode_quote_inside_unquoted_field_is_literal() {
        let grid = decode("a\"b,c").unwrap();
        assert_eq!(values(&grid), vec![vec!["a\"b", "c"]]);
    }

    #[test]
    fn test_decode_unterminated_quote_reports_opening_line() {
        let err = decode("a,b\nc,\"open\nstill open").unwrap_err();
        match err {
            GridpadError::MalformedInput { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_empty_input() {
        assert!(matches!(decode(""), Err(GridpadError::EmptyCsv)));
        assert!(matches!(decode("\n\r\n\n"), Err(GridpadError::EmptyCsv)));
    }

    #[test]
    fn test_header_round_trip() {
        let mut grid = Grid::new(2, 2);
        grid.rename_column(0, "Name").unwrap();
        grid.rename_column(1, "Qty, units").unwrap();
        grid.set_cell_value(1, 1, "3").unwrap();
        let text = encode_with_header(&grid);
        assert!(text.starts_with("\"Name\",\"Qty, units\"\n"));
        let decoded = decode_with_header(&text).unwrap();
        assert_eq!(decoded.column_names(), grid.column_names());
        assert_eq!(values(&decoded), values(&grid));
    }

    #[test]
    fn test_header_only() {
        let grid = decode_with_header("x,y,z").unwrap();
        assert_eq!(grid.column_names(), &["x", "y", "z"]);
        assert_eq!(grid.row_count(), 1);
        assert_eq!(grid.col_count(), 3);
    }

    #[test]
    fn test_header_narrower_than_data() {
        let grid = decode_with_header("id\n1,2,3").unwrap();
        assert_eq!(grid.column_names(), &["id", "B", "C"]);
    }

    #[test]
    fn test_header_wider_than_data() {
        let grid = decode_with_header("a,b,c\n1").unwrap();
        assert_eq!(grid.column_names(), &["a", "b", "c"]);
        assert_eq!(values(&grid), vec![vec!["1", "", ""]]);
    }

    #[test]
    fn test_write_then_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_NAME);
        let (grid, _) = Grid::from_rows(vec![vec!["1".into(), "two".into()]]);
        write_csv(&path, &grid, &CsvOptions::default()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "\"1\",\"two\"");
        let back = read_csv(&path, &CsvOptions::default()).unwrap();
        assert_eq!(values(&back), values(&grid));
    }
}
