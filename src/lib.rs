//! # policy-tracker
//!
//! Records and queries policy changes in PostgreSQL: create the schema, insert
//! records, then list, filter, report on and export them.
//!
//! ## Quick Example
//!
//! ```rust
//! use policy_tracker::prelude::*;
//!
//! let filters = QueryFilters {
//!     category: Some("Compliance".into()),
//!     since: Some("2026-01-01".into()),
//!     ..QueryFilters::default()
//! };
//! let clause = build_where_clause(&filters, &[]);
//! assert_eq!(clause, " where category = 'Compliance' and effective_date >= '2026-01-01'");
//! ```
//!
//! ## Commands
//!
//! | Command    | Statement                                   |
//! |------------|---------------------------------------------|
//! | `init`     | create schema and table if missing          |
//! | `seed`     | insert three example records                |
//! | `add`      | insert one record                           |
//! | `show`     | select one record by id                     |
//! | `list`     | filtered summary, newest first              |
//! | `export`   | filtered rows written as CSV                |
//! | `report`   | counts grouped by category, impact or owner |
//! | `upcoming` | effective dates in the next N days          |

pub mod builder;
pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod escape;
pub mod model;
pub mod output;

pub mod prelude {
    pub use crate::builder::*;
    pub use crate::config::{ConnectTarget, TrackerConfig};
    pub use crate::engine::PolicyDb;
    pub use crate::error::*;
    pub use crate::escape::{escape_csv_field, sanitize_for_literal};
    pub use crate::model::*;
}
