//! Plagio remote match source
//!
//! Asks a generative model to spot copied or reworded passages between
//! documents and hands its answer to the detector as untrusted
//! [`ExternalMatch`](matcher::ExternalMatch) entries. The detector clamps,
//! re-anchors and merges them with its own matches; nothing here decides
//! the score.
//!
//! The client speaks the `generateContent` protocol: the prompt goes out as
//! a single user turn, the answer comes back as text that should hold a
//! JSON object with a `matches` array.
//!
//! ## Quick example
//!
//! ```no_run
//! use matcher::{CancellationToken, Detector, DetectorConfig, Document};
//! use remote::{GenerativeMatchSource, RemoteConfig, RetryConfig, Retrying};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // reads GEMINI_API_KEY
//!     let source = GenerativeMatchSource::new(RemoteConfig::default())?;
//!     let source = Retrying::new(source, RetryConfig::default().with_max_retries(2));
//!
//!     let detector = Detector::new(DetectorConfig::default())?;
//!     let docs = [
//!         Document::new("a.txt", "primer texto"),
//!         Document::new("b.txt", "segundo texto"),
//!     ];
//!     let result = detector
//!         .analyze(&docs, Some(&source), &CancellationToken::new())
//!         .await?;
//!     println!("{}%", result.similarity);
//!     Ok(())
//! }
//! ```
//!
//! ## Env vars to know
//!
//! - `GEMINI_API_KEY` - API key, unless `api_key_env` names another variable

pub mod client;
pub mod config;
pub mod prompt;
pub mod response;
pub mod retry;
mod serde_millis;

pub use client::GenerativeMatchSource;
pub use config::RemoteConfig;
pub use retry::{RetryConfig, Retrying};
