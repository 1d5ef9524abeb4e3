/// Data layer: the table model, loading, registry, caching, and search.
///
/// Architecture:
/// ```text
///  .xlsx / .xls / .ods / .csv
///        │
///        ▼
///   ┌──────────┐
///   │ registry  │  name → path over bundled workbook + uploads
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse one sheet → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  (path, sheet, offset) → Table, cleared on upload
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  search   │  per-column AND filter / whole-row OR search
///   └──────────┘
/// ```

pub mod cache;
pub mod loader;
pub mod model;
pub mod registry;
pub mod search;
