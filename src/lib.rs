#![doc(test(attr(deny(warnings))))]

//! Home Budget: a command shell for logging income and expenses and
//! reviewing spending dashboards over a date range.

pub mod cli;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Home Budget tracing initialized.");
    });
}
