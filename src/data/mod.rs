/// Data layer: table model and the per-file pipeline steps.
///
/// Architecture:
/// ```text
///  upload (.csv / .xlsx)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  detect format, parse → Table, header repair
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  drop duplicate rows, fill gaps with column means
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ projection  │  keep selected columns, in order
///   └────────────┘
///        │
///        ├──────────────► chart   numeric columns → line series
///        ▼
///   ┌──────────┐
///   │  export   │  Table → CSV / XLSX bytes + file name + MIME type
///   └──────────┘
/// ```

pub mod chart;
pub mod clean;
pub mod export;
pub mod header;
pub mod loader;
pub mod model;
pub mod naming;
pub mod projection;
