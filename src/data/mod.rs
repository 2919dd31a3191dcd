//! Data layer: core types, loading, filtering and summaries.
//!
//! Architecture:
//! ```text
//!  .csv / .tsv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  cache    │  load once per source identity → Arc<Dataset>
//!   │  loader   │  parse file, check required columns
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────────┐
//!   │   Dataset     │  Vec<Record>, column index
//!   └──────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  per-column allow-lists → filtered Dataset ──► export (CSV)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────────────┐
//!   │ crosstab / counts │  row-normalised % tables, frequencies
//!   └──────────────────┘
//! ```

pub mod cache;
pub mod counts;
pub mod crosstab;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
