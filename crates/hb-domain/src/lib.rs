//! hb-domain
//!
//! Pure domain models (Entry, Category, Repeat, DateRange).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod category;
pub mod common;
pub mod entry;

pub use category::*;
pub use common::*;
pub use entry::*;
