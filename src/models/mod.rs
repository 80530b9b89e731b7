//! Domain models for the project ledger.
//!
//! # Core Concepts
//!
//! - [`Project`]: One engineering project. Owns its dates, hours, rates and
//!   amounts, validates them on construction and derives total cost,
//!   profitability and estimate accuracy.
//! - [`ProjectStatus`]: Three-state lifecycle. Projects start `InProgress` and
//!   move to `Completed` (a completion date was recorded) or `Cancelled`.
//! - [`ProjectSummary`]: Nested, serializable snapshot of a project.
//!
//! Nothing here performs I/O or logging; callers decide how to report a
//! [`ProjectError`].

mod error;
mod project;
mod summary;

pub use error::*;
pub use project::*;
pub use summary::*;

pub(crate) use project::{profitability, round_to_cents};
