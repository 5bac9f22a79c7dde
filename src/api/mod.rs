//! HTTP surface consumed by the browser extension

pub mod endpoints;
pub mod extract;
