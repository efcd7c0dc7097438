//! smartslug - readable slug generation for URL shorteners
//!
//! Turns a destination URL (plus optional page metadata and a user profile
//! snapshot) into a slug such as `Nike.AirMax.Sale`.
//!
//! # Features
//! - **cli**: `smartslug` command-line tool (default)
//!
//! # Architecture
//! - `utils`: URL normalization and slug grammar helpers
//! - `services`: signal detection, tier selection, heuristic and AI
//!   generators, pattern learning, collision resolution, the engine facade
//! - `cache`: read-through cache with per-key single-flight
//! - `models`: data types shared across the crate
//! - `config`: Configuration management
//! - `system`: logging setup
//! - `interfaces`: command-line front end

pub mod cache;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod errors;
#[cfg(feature = "cli")]
pub mod interfaces;
pub mod models;
pub mod services;
pub mod system;
pub mod utils;

pub use errors::{Result, SmartSlugError};
pub use services::{GenerateRequest, SlugEngine};
