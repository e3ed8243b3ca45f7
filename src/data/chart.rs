use super::model::Table;
use crate::error::{SweepError, SweepResult};

/// One numeric column ready to plot against row index.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    /// `[row_index, value]`; rows with a missing value are omitted.
    pub points: Vec<[f64; 2]>,
}

/// Build one series per numeric column of `table`.
///
/// Fails with [`SweepError::InsufficientNumericColumns`] when the table has
/// no numeric column to draw.
pub fn numeric_series(table: &Table) -> SweepResult<Vec<Series>> {
    let series: Vec<Series> = table
        .columns
        .iter()
        .filter(|c| c.is_numeric())
        .map(|c| Series {
            name: c.name.clone(),
            points: c
                .values
                .iter()
                .enumerate()
                .filter_map(|(row, v)| v.as_f64().map(|y| [row as f64, y]))
                .collect(),
        })
        .collect();

    if series.is_empty() {
        return Err(SweepError::InsufficientNumericColumns);
    }
    Ok(series)
}
