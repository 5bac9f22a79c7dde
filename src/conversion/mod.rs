//! Conversion between client requests, model prompts and model replies

pub mod prompt_builder;
pub mod response_parser;
