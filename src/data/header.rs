use super::loader::placeholder_name;
use super::model::{mangle_duplicate_names, Column, Table};

/// A column name is a placeholder when it is blank or reads `Unnamed: <n>`,
/// the label given to header cells that carried no text.
pub fn is_placeholder_name(name: &str) -> bool {
    let name = name.trim();
    if name.is_empty() {
        return true;
    }
    match name.strip_prefix("Unnamed:") {
        Some(rest) => {
            let digits = rest.trim_start();
            !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

/// Promote row 0 to the header when no column carries a real name.
///
/// Applies only when the table has columns, every name is a placeholder and
/// row 0 holds at least one value. Cells missing from row 0 keep their
/// placeholder; repeated names are mangled (`a`, `a.1`). Remaining rows
/// shift up and every column is re-typed without the header row.
///
/// Returns whether a promotion happened.
pub fn repair_headers(table: &mut Table) -> bool {
    if table.columns.is_empty() || table.is_empty() {
        return false;
    }
    if !table.columns.iter().all(|c| is_placeholder_name(&c.name)) {
        return false;
    }
    if table.columns.iter().all(|c| c.values[0].is_null()) {
        return false;
    }

    let names: Vec<String> = table
        .columns
        .iter()
        .enumerate()
        .map(|(idx, c)| {
            let label = c.values[0].to_field();
            let label = label.trim();
            if label.is_empty() {
                placeholder_name(idx)
            } else {
                label.to_string()
            }
        })
        .collect();
    let names = mangle_duplicate_names(names);

    let columns = std::mem::take(&mut table.columns);
    table.columns = columns
        .into_iter()
        .zip(names)
        .map(|(mut col, name)| {
            col.values.remove(0);
            Column { name, ..col }.retyped()
        })
        .collect();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv;
    use crate::data::model::{CellValue, ColumnKind};

    #[test]
    fn placeholder_rule() {
        assert!(is_placeholder_name("Unnamed: 0"));
        assert!(is_placeholder_name("Unnamed: 12"));
        assert!(is_placeholder_name("  "));
        assert!(!is_placeholder_name("Unnamed: x"));
        assert!(!is_placeholder_name("Unnamed column"));
        assert!(!is_placeholder_name("score"));
    }

    #[test]
    fn named_headers_are_left_alone() {
        let mut table = parse_csv(b"a,b\n1,2\n").unwrap();
        let before = table.clone();
        assert!(!repair_headers(&mut table));
        assert_eq!(table, before);
    }

    #[test]
    fn partially_named_headers_are_left_alone() {
        let mut table = parse_csv(b"a,\nx,y\n").unwrap();
        assert!(!repair_headers(&mut table));
        assert_eq!(table.column_names(), vec!["a", "Unnamed: 1"]);
    }

    #[test]
    fn promotes_first_row_and_retypes() {
        let mut table = parse_csv(b",\nid,score\n1,2.5\n2,\n").unwrap();
        assert_eq!(table.row_count(), 3);
        assert!(repair_headers(&mut table));
        assert_eq!(table.column_names(), vec!["id", "score"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.columns[0].kind, ColumnKind::Integer);
        assert_eq!(table.columns[1].kind, ColumnKind::Float);
        assert_eq!(table.columns[1].values, vec![CellValue::Float(2.5), CellValue::Null]);
    }

    #[test]
    fn blank_cells_in_promoted_row_keep_placeholders() {
        let mut table = parse_csv(b",,\nid,,id\n1,2,3\n").unwrap();
        assert!(repair_headers(&mut table));
        assert_eq!(table.column_names(), vec!["id", "Unnamed: 1", "id.1"]);
    }

    #[test]
    fn repair_is_idempotent() {
        let mut once = parse_csv(b",\nid,score\n1,2\n").unwrap();
        repair_headers(&mut once);
        let mut twice = once.clone();
        assert!(!repair_headers(&mut twice));
        assert_eq!(once, twice);
    }

    #[test]
    fn all_blank_first_row_is_not_promoted() {
        let mut table = parse_csv(b",\n,\n1,2\n").unwrap();
        assert!(!repair_headers(&mut table));
        assert_eq!(table.row_count(), 2);
    }
}
