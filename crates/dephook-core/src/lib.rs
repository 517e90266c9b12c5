//! # dephook-core
//!
//! Core crate for the deployment hook workspace. Contains the unified error
//! system, configuration schemas, compile-time scenario constants, and the
//! chain-facing value types (addresses, amounts, vote settings, vesting
//! schedules).
//!
//! This crate has **no** internal dependencies on other workspace crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
