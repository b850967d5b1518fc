//! Common test utilities
//!
//! This module is shared across all integration tests

pub mod fixtures;
pub mod scripted;

#[allow(unused_imports)]
pub use fixtures::{fast_config, meta_page, shared_data_page, LOGIN_WALL};
#[allow(unused_imports)]
pub use scripted::{Reply, ScriptedTransport};
