/// Data layer: core types, loading, filtering, and statistics.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → ListingSet
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ ListingSet  │  Vec<Listing>, filter option bounds
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply range/membership predicates → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  metrics, group-bys, correlations over the subset
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
