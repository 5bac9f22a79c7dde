//! API data models
//!
//! This module contains the client request bodies and the wire formats of the
//! Gemini and YouTube APIs.

pub mod gemini;
pub mod requests;
pub mod youtube;
