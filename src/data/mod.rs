/// Data layer: core types, loading, per-file processing, and export.
///
/// Architecture:
/// ```text
///  .csv / .xlsx
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (typed columns)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ pipeline  │  clean → select → numeric coercion → sums
///   └──────────┘      → date candidates → date coercion → counts
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  Dataset → .xlsx bytes (CSV-origin files only)
///   └──────────┘
/// ```
pub mod clean;
pub mod dates;
pub mod export;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod transform;
