//! Foundation types for cliengine.
//!
//! This crate holds the data model shared by every cliengine crate: typed
//! argument descriptors and their parsed values, the uniform result object
//! returned by dispatch, the error taxonomy, and persisted settings.

pub mod args;
pub mod config;
pub mod error;
pub mod result;
