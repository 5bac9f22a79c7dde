//! Constants shared across the relay
//!
//! Route paths, sentinel strings and fallback messages returned to the
//! extension. The extension matches on some of these, so they are part of the
//! wire contract.

/// Route paths
pub mod route {
    pub const ROOT: &str = "/";
    pub const HEALTH: &str = "/health";
    pub const HINT: &str = "/hint";
    pub const EXPLAIN_ERROR: &str = "/explain_error";
    pub const ANALYZE: &str = "/analyze";
    pub const OPTIMAL_CODE: &str = "/optimal_code";
    pub const SIMILAR_PROBLEMS: &str = "/similar_problems";
    pub const COMPANIES_ASKED: &str = "/companies_asked";
    pub const YOUTUBE_SEARCH: &str = "/youtube_search";
}

/// Sentinel and fallback texts
pub mod sentinel {
    /// Substituted for the model's text when the generation call fails
    pub const MODEL_UNAVAILABLE: &str = "[AI Error: Unable to get response]";

    /// `error` field of the optimal-code fallback object
    pub const UNPARSEABLE_JSON: &str = "AI response could not be parsed as JSON";

    /// First element of the similar-problems fallback array
    pub const UNPARSEABLE_SIMILAR: &str = "[AI error: Could not parse similar problems]";

    /// `error` field when the video search has no usable result
    pub const NO_VIDEO: &str = "No video found";
}

/// Keys of the optimal-code JSON object, in prompt order
pub const OPTIMAL_CODE_KEYS: [&str; 15] = [
    "optimal_code_cpp",
    "optimal_code_java",
    "optimal_code_python",
    "optimal_code_javascript",
    "optimal_explanation",
    "optimal_time_complexity",
    "optimal_space_complexity",
    "brute_code_cpp",
    "brute_code_java",
    "brute_code_python",
    "brute_code_javascript",
    "brute_explanation",
    "brute_time_complexity",
    "brute_space_complexity",
    "comparison",
];
