//! Shared plumbing for the `asset-import` and `user-import` programs.

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
