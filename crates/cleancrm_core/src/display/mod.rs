//! Tabular projections of store collections.
//!
//! # Responsibility
//! - Turn a collection snapshot into header + string rows for presentation.
//!
//! # Invariants
//! - Projection is pure: no filtering, no validation, no store mutation.
//! - Keyed collections render in key order, lists in insertion order.

mod table;

pub use table::{project, Table, Tabular};
