/// Data layer: documents, extraction, caching, and normalization.
///
/// Architecture:
/// ```text
///   .csv / .pdf upload
///        │
///        ▼
///   ┌──────────┐      ┌──────────┐
///   │  loader   │ ───▶ │   pdf    │  text layout → tables
///   └──────────┘      └──────────┘
///        │   (pdf results memoized in `cache`, keyed by content digest)
///        ▼
///   ┌───────────┐
///   │ normalize  │  concatenate tables → Dataset
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  table + all_columns + numeric_columns
///   └──────────┘
/// ```

pub mod cache;
pub mod document;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod pdf;
