/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (required columns checked)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  entity + year range → FilteredView
///   └──────────┘
///        │
///        ├──────────────┬───────────────┐
///        ▼              ▼               ▼
///   raw view     ┌───────────┐   ┌───────────┐
///   (health      │ aggregate  │   │  series    │
///    chart)      │ per year   │   │  selector  │
///                └───────────┘   └───────────┘
/// ```
///
/// All functions are pure; the loaded `Dataset` is never mutated.

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod series;

pub use aggregate::aggregate;
pub use filter::{filter, year_bounds};
pub use loader::load;
pub use series::select_series;
