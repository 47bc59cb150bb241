//! Slovo - keyword match engine for Russian-language social media text.
//!
//! Normalizes content, matches a mutable keyword set with word-boundary
//! rules tolerant of Russian inflection, and keeps persisted match rows
//! an exact mirror of current matches via incremental and batch
//! reconciliation.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod engine;
pub mod error;
pub mod observability;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
