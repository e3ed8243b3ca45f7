use std::cmp::Ordering;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the common dataframe dtypes.
/// Rows are hashed for deduplication, so `CellValue` must be `Eq + Hash`.
#[derive(Debug, Clone)]
pub enum CellValue {
    Null,
    Integer(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

// -- Manual Eq/Ord: floats compare by `total_cmp`, consistent with hashing the bits.
// `-0.0` is folded into `0.0` first so the two count as the same value. --

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => unsigned_zero(*a).total_cmp(&unsigned_zero(*b)),
            (Text(a), Text(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

fn unsigned_zero(f: f64) -> f64 {
    if f == 0.0 {
        0.0
    } else {
        f
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => unsigned_zero(*f).to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => write!(f, "<null>"),
            other => write!(f, "{}", other.to_field()),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64`, for means and chart points.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// The textual form written to CSV fields and used when a mixed column
    /// falls back to text. `Null` is the empty string.
    pub fn to_field(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(v) => format_float(*v),
            CellValue::Bool(true) => "True".to_string(),
            CellValue::Bool(false) => "False".to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }
}

/// Integral floats keep one decimal (`4.0`) so a float column stays
/// recognisably float after a round trip through text.
pub fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

// ---------------------------------------------------------------------------
// Text parsing
// ---------------------------------------------------------------------------

/// Tokens read as missing values, matching the usual dataframe defaults.
const MISSING_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "null", "NULL", "None", "#N/A", "<NA>",
];

pub fn is_missing_token(raw: &str) -> bool {
    MISSING_TOKENS.contains(&raw.trim())
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// Inferred type of a whole column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Boolean,
    Text,
    /// Every value is missing.
    Empty,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }

    pub fn label(self) -> &'static str {
        match self {
            ColumnKind::Integer => "int",
            ColumnKind::Float => "float",
            ColumnKind::Boolean => "bool",
            ColumnKind::Text => "text",
            ColumnKind::Empty => "empty",
        }
    }
}

/// One named, homogeneous column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<CellValue>,
}

impl Column {
    /// Build a column from raw text fields (CSV), inferring its type.
    ///
    /// * all fields parse as `i64` and none are missing → `Integer`
    /// * all fields parse as numbers → `Float`
    /// * all fields are `true`/`false` → `Boolean`
    /// * all fields missing → `Empty`
    /// * anything else → `Text`, keeping the original strings
    pub fn from_text(name: impl Into<String>, raw: &[String]) -> Self {
        let name = name.into();
        let present: Vec<&str> = raw
            .iter()
            .filter(|s| !is_missing_token(s))
            .map(|s| s.trim())
            .collect();

        if present.is_empty() {
            return Column {
                name,
                kind: ColumnKind::Empty,
                values: vec![CellValue::Null; raw.len()],
            };
        }

        let has_missing = present.len() < raw.len();
        let map_present = |f: &dyn Fn(&str) -> CellValue| -> Vec<CellValue> {
            raw.iter()
                .map(|s| {
                    if is_missing_token(s) {
                        CellValue::Null
                    } else {
                        f(s.trim())
                    }
                })
                .collect()
        };

        if !has_missing && present.iter().all(|s| s.parse::<i64>().is_ok()) {
            let values = map_present(&|s: &str| s.parse::<i64>().map_or(CellValue::Null, CellValue::Integer));
            return Column { name, kind: ColumnKind::Integer, values };
        }
        if present.iter().all(|s| s.parse::<f64>().is_ok()) {
            let values = map_present(&|s: &str| s.parse::<f64>().map_or(CellValue::Null, CellValue::Float));
            return Column { name, kind: ColumnKind::Float, values };
        }
        if present.iter().all(|s| parse_bool(s).is_some()) {
            let values = map_present(&|s: &str| parse_bool(s).map_or(CellValue::Null, CellValue::Bool));
            return Column { name, kind: ColumnKind::Boolean, values };
        }

        let values = raw
            .iter()
            .map(|s| {
                if is_missing_token(s) {
                    CellValue::Null
                } else {
                    CellValue::Text(s.clone())
                }
            })
            .collect();
        Column { name, kind: ColumnKind::Text, values }
    }

    /// Build a column from already-typed cells (spreadsheets), settling on a
    /// single kind. Integral floats with nothing missing become integers;
    /// mixed columns become text.
    pub fn from_cells(name: impl Into<String>, cells: Vec<CellValue>) -> Self {
        let name = name.into();
        let present = cells.iter().filter(|c| !c.is_null()).count();
        if present == 0 {
            return Column {
                name,
                kind: ColumnKind::Empty,
                values: cells,
            };
        }
        let has_missing = present < cells.len();
        let non_null = || cells.iter().filter(|c| !c.is_null());

        if non_null().all(|c| c.as_f64().is_some()) {
            let integral = non_null().all(|c| match c {
                CellValue::Integer(_) => true,
                CellValue::Float(v) => v.fract() == 0.0 && v.abs() < 9.0e15,
                _ => false,
            });
            if integral && !has_missing {
                let values = cells
                    .iter()
                    .map(|c| match c {
                        CellValue::Float(v) => CellValue::Integer(*v as i64),
                        other => other.clone(),
                    })
                    .collect();
                return Column { name, kind: ColumnKind::Integer, values };
            }
            let values = cells
                .iter()
                .map(|c| c.as_f64().map_or(CellValue::Null, CellValue::Float))
                .collect();
            return Column { name, kind: ColumnKind::Float, values };
        }

        if non_null().all(|c| matches!(c, CellValue::Bool(_))) {
            return Column { name, kind: ColumnKind::Boolean, values: cells };
        }

        if non_null().all(|c| matches!(c, CellValue::Text(_))) {
            return Column { name, kind: ColumnKind::Text, values: cells };
        }

        let values = cells
            .into_iter()
            .map(|c| match c {
                CellValue::Null => CellValue::Null,
                CellValue::Text(s) => CellValue::Text(s),
                // A whole number in a spreadsheet reads as an integer.
                CellValue::Float(v) if v.fract() == 0.0 && v.abs() < 9.0e15 => {
                    CellValue::Text((v as i64).to_string())
                }
                other => CellValue::Text(other.to_field()),
            })
            .collect();
        Column { name, kind: ColumnKind::Text, values }
    }

    /// Infer the kind again from the current values. Text columns are
    /// re-parsed as text; anything else is settled as typed cells.
    pub fn retyped(self) -> Self {
        if self.kind == ColumnKind::Text || self.kind == ColumnKind::Empty {
            let raw: Vec<String> = self.values.iter().map(CellValue::to_field).collect();
            Column::from_text(self.name, &raw)
        } else {
            Column::from_cells(self.name, self.values)
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_numeric(&self) -> bool {
        self.kind.is_numeric()
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded file
// ---------------------------------------------------------------------------

/// Ordered columns sharing one row count.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        debug_assert!(
            columns.windows(2).all(|w| w[0].len() == w[1].len()),
            "all columns must share the same row count"
        );
        Table { columns }
    }

    /// Number of rows (0 for a table without columns).
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Clone of row `idx` in column order.
    pub fn row(&self, idx: usize) -> Vec<CellValue> {
        self.columns.iter().map(|c| c.values[idx].clone()).collect()
    }

    /// First `n` rows as a new table.
    pub fn head(&self, n: usize) -> Table {
        let n = n.min(self.row_count());
        Table {
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    kind: c.kind,
                    values: c.values[..n].to_vec(),
                })
                .collect(),
        }
    }

    /// Keep rows whose `keep` flag is set. `keep` must have one entry per row.
    pub fn retain_rows(&mut self, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.row_count());
        for col in &mut self.columns {
            let mut flags = keep.iter();
            col.values.retain(|_| *flags.next().unwrap_or(&false));
        }
    }
}

/// Make names unique the way dataframe readers do: `a`, `a.1`, `a.2`.
pub fn mangle_duplicate_names(names: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !out.contains(&name) {
            out.push(name);
            continue;
        }
        let mut n = 1;
        loop {
            let candidate = format!("{name}.{n}");
            if !out.contains(&candidate) {
                out.push(candidate);
                break;
            }
            n += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn text_column_infers_integer() {
        let col = Column::from_text("id", &strings(&["1", "2", "3"]));
        assert_eq!(col.kind, ColumnKind::Integer);
        assert_eq!(col.values[2], CellValue::Integer(3));
    }

    #[test]
    fn integers_with_gaps_widen_to_float() {
        let col = Column::from_text("b", &strings(&["", "4"]));
        assert_eq!(col.kind, ColumnKind::Float);
        assert_eq!(col.values, vec![CellValue::Null, CellValue::Float(4.0)]);
    }

    #[test]
    fn mixed_text_keeps_original_strings() {
        let col = Column::from_text("code", &strings(&["1.50", "abc", "NA"]));
        assert_eq!(col.kind, ColumnKind::Text);
        assert_eq!(
            col.values,
            vec![
                CellValue::Text("1.50".to_string()),
                CellValue::Text("abc".to_string()),
                CellValue::Null,
            ]
        );
    }

    #[test]
    fn booleans_and_empty_columns() {
        let col = Column::from_text("flag", &strings(&["True", "false"]));
        assert_eq!(col.kind, ColumnKind::Boolean);
        let col = Column::from_text("gap", &strings(&["", "nan"]));
        assert_eq!(col.kind, ColumnKind::Empty);
        assert_eq!(col.missing_count(), 2);
    }

    #[test]
    fn typed_cells_settle_integral_floats() {
        let col = Column::from_cells("n", vec![CellValue::Float(1.0), CellValue::Float(2.0)]);
        assert_eq!(col.kind, ColumnKind::Integer);
        assert_eq!(col.values[0], CellValue::Integer(1));

        let col = Column::from_cells("m", vec![CellValue::Float(1.0), CellValue::Text("x".into())]);
        assert_eq!(col.kind, ColumnKind::Text);
        assert_eq!(col.values[0], CellValue::Text("1".to_string()));
    }

    #[test]
    fn float_formatting_keeps_a_decimal() {
        assert_eq!(format_float(4.0), "4.0");
        assert_eq!(format_float(2.5), "2.5");
        assert_eq!(format_float(1e16), "10000000000000000.0");
        assert_eq!(format_float(-3e20), "-300000000000000000000.0");
        assert_eq!(format_float(f64::INFINITY), "inf");
        assert_eq!(CellValue::Bool(true).to_field(), "True");
    }

    #[test]
    fn equal_rows_hash_alike() {
        use std::collections::HashSet;
        let mut seen = HashSet::new();
        assert!(seen.insert(vec![CellValue::Float(1.5), CellValue::Null]));
        assert!(!seen.insert(vec![CellValue::Float(1.5), CellValue::Null]));
    }

    #[test]
    fn signed_zeros_are_the_same_value() {
        use std::collections::HashSet;
        assert_eq!(CellValue::Float(0.0), CellValue::Float(-0.0));
        let mut seen = HashSet::new();
        assert!(seen.insert(CellValue::Float(0.0)));
        assert!(!seen.insert(CellValue::Float(-0.0)));
        assert_ne!(CellValue::Float(0.0), CellValue::Float(1e-300));
    }

    #[test]
    fn duplicate_names_are_mangled() {
        let out = mangle_duplicate_names(strings(&["a", "a", "b", "a"]));
        assert_eq!(out, strings(&["a", "a.1", "b", "a.2"]));
    }

    #[test]
    fn head_and_retain_rows() {
        let mut t = Table::new(vec![Column::from_text("x", &strings(&["1", "2", "3"]))]);
        assert_eq!(t.head(2).row_count(), 2);
        assert_eq!(t.head(10).row_count(), 3);
        t.retain_rows(&[true, false, true]);
        assert_eq!(t.columns[0].values, vec![CellValue::Integer(1), CellValue::Integer(3)]);
    }
}
