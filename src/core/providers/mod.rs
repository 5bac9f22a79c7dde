//! Provider implementations

pub mod gemini;
pub mod youtube;

pub use gemini::GeminiProvider;
pub use youtube::YouTubeClient;
