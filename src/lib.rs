//! Engineering project ledger.
//!
//! Records projects entered by hand and derives total cost, profitability and
//! schedule-estimate accuracy from them. [`models`] holds the validated project
//! entity; the remaining modules are the terminal shell around it.

pub mod config;
pub mod form;
pub mod models;
pub mod registry;
pub mod render;
pub mod session;
