use super::model::Table;
use crate::error::{SweepError, SweepResult};

/// Restrict `table` to the named columns, in the order given.
///
/// Unknown names are an error; a name listed twice is kept once, at its
/// first position. Row count is unchanged.
pub fn project(table: &Table, names: &[String]) -> SweepResult<Table> {
    let mut columns = Vec::with_capacity(names.len());
    let mut taken: Vec<&str> = Vec::with_capacity(names.len());

    for name in names {
        if taken.contains(&name.as_str()) {
            continue;
        }
        let col = table
            .column(name)
            .ok_or_else(|| SweepError::UnknownColumn(name.clone()))?;
        columns.push(col.clone());
        taken.push(name);
    }

    Ok(Table::new(columns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> Table {
        parse_csv(b"a,b,c\n1,x,2.5\n2,y,3.5\n3,z,\n").unwrap()
    }

    #[test]
    fn keeps_requested_columns_in_order() {
        let table = sample();
        let out = project(&table, &names(&["c", "a"])).unwrap();
        assert_eq!(out.column_names(), names(&["c", "a"]));
        assert_eq!(out.row_count(), table.row_count());
        assert_eq!(out.columns[1], table.columns[0]);
    }

    #[test]
    fn all_columns_is_identity() {
        let table = sample();
        let out = project(&table, &table.column_names()).unwrap();
        assert_eq!(out, table);
    }

    #[test]
    fn unknown_column_is_an_error() {
        let err = project(&sample(), &names(&["a", "nope"])).unwrap_err();
        assert!(matches!(err, crate::error::SweepError::UnknownColumn(ref n) if n == "nope"));
    }

    #[test]
    fn repeated_names_are_kept_once() {
        let out = project(&sample(), &names(&["b", "a", "b"])).unwrap();
        assert_eq!(out.column_names(), names(&["b", "a"]));
    }

    #[test]
    fn empty_selection_gives_no_columns() {
        let out = project(&sample(), &[]).unwrap();
        assert_eq!(out.column_count(), 0);
    }
}
