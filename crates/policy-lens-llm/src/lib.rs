//! LLM collaborator for contract explanations.
//!
//! The core never depends on this crate: scores and duplicate findings are
//! computed before any model is called, and are only passed along as context.
//!
//! # Clients
//!
//! - [`MockClient`]: Deterministic mock for testing
//! - `OpenAiClient`: OpenAI-compatible chat completions (feature `openai`)

pub mod client;
pub mod excerpt;
pub mod explainer;
#[cfg(feature = "openai")]
pub mod openai;
pub mod prompts;

pub use client::*;
pub use excerpt::*;
pub use explainer::*;
#[cfg(feature = "openai")]
pub use openai::OpenAiClient;
pub use prompts::*;
