//! Core application modules
//!
//! This module contains configuration, constants, logging, the provider
//! clients and the assistant use cases built on them.

pub mod assistant;
pub mod config;
pub mod constants;
pub mod logging;
pub mod provider;
pub mod providers;
pub mod retry;

#[cfg(test)]
pub mod test_helpers;
