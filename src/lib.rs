#![doc(test(attr(deny(warnings))))]

//! Finance Core is the query engine behind a personal-finance dashboard:
//! typed entities, filtering, sorting, aggregation and a formatting contract,
//! served from a shared in-memory store.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod query;
pub mod store;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Finance Core tracing initialized.");
    });
}
