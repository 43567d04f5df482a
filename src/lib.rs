// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod persistence;
pub mod report;
pub use crate::core::engine::SynonymEngine;
pub use crate::error::{Error, Result};
