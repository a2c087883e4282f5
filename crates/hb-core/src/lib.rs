//! hb-core
//!
//! Business logic and services for the home budget.
//! Depends on hb-domain. No CLI, no terminal I/O, no direct storage interactions.

pub mod dashboard_service;
pub mod entry_form;
pub mod entry_log;
pub mod error;
pub mod histogram;
pub mod recurrence;
pub mod sample;
pub mod storage;
pub mod time;

pub use dashboard_service::*;
pub use entry_form::*;
pub use entry_log::*;
pub use error::CoreError;
pub use histogram::*;
pub use recurrence::*;
pub use sample::*;
pub use storage::*;
pub use time::*;

#[cfg(test)]
mod tests;
