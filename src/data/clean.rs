use std::collections::HashSet;

use super::model::{CellValue, ColumnKind, Table};

// ---------------------------------------------------------------------------
// Deduplication
// ---------------------------------------------------------------------------

/// Drop rows equal in every column to an earlier row. The first occurrence
/// stays and row order is preserved. Returns the number of rows removed.
pub fn remove_duplicates(table: &mut Table) -> usize {
    let rows = table.row_count();
    let mut seen: HashSet<Vec<CellValue>> = HashSet::with_capacity(rows);
    let keep: Vec<bool> = (0..rows).map(|idx| seen.insert(table.row(idx))).collect();

    let removed = keep.iter().filter(|k| !**k).count();
    if removed > 0 {
        table.retain_rows(&keep);
    }
    removed
}

// ---------------------------------------------------------------------------
// Missing-value imputation
// ---------------------------------------------------------------------------

/// Column that had gaps filled by [`fill_missing_with_mean`].
#[derive(Debug, Clone, PartialEq)]
pub struct FilledColumn {
    pub column: String,
    pub filled: usize,
    pub mean: f64,
}

/// What [`fill_missing_with_mean`] did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImputeReport {
    pub filled: Vec<FilledColumn>,
    /// Columns with no values at all; their mean is undefined so they are
    /// left unchanged.
    pub skipped: Vec<String>,
}

impl ImputeReport {
    pub fn total_filled(&self) -> usize {
        self.filled.iter().map(|f| f.filled).sum()
    }
}

/// Replace missing entries of numeric columns with that column's mean over
/// its present values. Filled columns become `Float`. Text and boolean
/// columns are untouched; all-missing columns are reported as skipped.
pub fn fill_missing_with_mean(table: &mut Table) -> ImputeReport {
    let mut report = ImputeReport::default();

    for col in &mut table.columns {
        match col.kind {
            ColumnKind::Empty => {
                if !col.values.is_empty() {
                    report.skipped.push(col.name.clone());
                }
            }
            kind if kind.is_numeric() => {
                let missing = col.missing_count();
                if missing == 0 {
                    continue;
                }
                let (sum, count) = col
                    .values
                    .iter()
                    .filter_map(CellValue::as_f64)
                    .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
                if count == 0 {
                    report.skipped.push(col.name.clone());
                    continue;
                }
                let mean = sum / count as f64;
                for v in &mut col.values {
                    *v = match v.as_f64() {
                        Some(x) => CellValue::Float(x),
                        None => CellValue::Float(mean),
                    };
                }
                col.kind = ColumnKind::Float;
                report.filled.push(FilledColumn {
                    column: col.name.clone(),
                    filled: missing,
                    mean,
                });
            }
            _ => {}
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv;
    use crate::data::model::Column;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn removes_exact_duplicates_keeping_first() {
        let mut table = parse_csv(b"k,v\na,1\nb,2\na,1\nc,3\nb,2\na,9\n").unwrap();
        let removed = remove_duplicates(&mut table);
        assert_eq!(removed, 2);
        assert_eq!(table.row_count(), 4);
        assert_eq!(
            table.columns[0].values,
            vec![
                CellValue::Text("a".into()),
                CellValue::Text("b".into()),
                CellValue::Text("c".into()),
                CellValue::Text("a".into()),
            ]
        );
        assert_eq!(table.columns[1].values[3], CellValue::Integer(9));
    }

    #[test]
    fn missing_values_compare_equal_for_dedup() {
        let mut table = parse_csv(b"a,b\n1,\n1,\n").unwrap();
        assert_eq!(remove_duplicates(&mut table), 1);
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn negative_zero_duplicates_positive_zero() {
        let mut table = parse_csv(b"a\n0.0\n-0.0\n").unwrap();
        assert_eq!(remove_duplicates(&mut table), 1);
        assert_eq!(table.columns[0].values, vec![CellValue::Float(0.0)]);
    }

    #[test]
    fn dedup_without_duplicates_is_noop() {
        let mut table = parse_csv(b"a\n1\n2\n").unwrap();
        let before = table.clone();
        assert_eq!(remove_duplicates(&mut table), 0);
        assert_eq!(table, before);
    }

    #[test]
    fn fills_with_mean_of_present_values() {
        let mut table = Table::new(vec![Column::from_text("x", &strings(&["1", "", "3"]))]);
        let report = fill_missing_with_mean(&mut table);
        assert_eq!(
            table.columns[0].values,
            vec![CellValue::Float(1.0), CellValue::Float(2.0), CellValue::Float(3.0)]
        );
        assert_eq!(report.total_filled(), 1);
        assert_eq!(report.filled[0].mean, 2.0);
    }

    #[test]
    fn scenario_single_present_value() {
        let mut table = parse_csv(b"a,b\n1,\n2,4\n").unwrap();
        fill_missing_with_mean(&mut table);
        assert_eq!(table.columns[0].values, vec![CellValue::Integer(1), CellValue::Integer(2)]);
        assert_eq!(table.columns[1].values, vec![CellValue::Float(4.0), CellValue::Float(4.0)]);
    }

    #[test]
    fn text_columns_are_untouched() {
        let mut table = parse_csv(b"name,score\nAda,\n,4\n").unwrap();
        fill_missing_with_mean(&mut table);
        assert_eq!(table.columns[0].values[1], CellValue::Null);
        assert_eq!(table.columns[1].values[0], CellValue::Float(4.0));
    }

    #[test]
    fn all_missing_column_is_skipped_and_reported() {
        let mut table = parse_csv(b"a,gap\n1,\n2,\n").unwrap();
        let report = fill_missing_with_mean(&mut table);
        assert_eq!(report.skipped, vec!["gap".to_string()]);
        assert!(report.filled.is_empty());
        assert_eq!(table.columns[1].kind, ColumnKind::Empty);
        assert_eq!(table.columns[1].missing_count(), 2);
    }
}
