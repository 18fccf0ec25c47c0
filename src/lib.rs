#![doc(test(attr(deny(warnings))))]

//! Budget Tracker keeps income, expense and savings entries, expands their
//! monthly and yearly recurrences into dated occurrences, and projects
//! balances, timelines and category shares from them.

pub mod budget;
pub mod cli;
pub mod clock;
pub mod config;
pub mod errors;
pub mod forecast;
pub mod interchange;
pub mod services;
pub mod storage;
pub mod store;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Budget Tracker tracing initialized.");
    });
}
