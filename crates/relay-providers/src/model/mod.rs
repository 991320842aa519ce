//! Language model providers
//!
//! | Provider | Description |
//! |----------|-------------|
//! | [`GeminiModel`] | Google Gemini `generateContent` with function calling |
//! | [`NullModel`] | Never answers; placeholder when no model is configured |

/// Gemini provider
pub mod gemini;
/// Null provider
pub mod null;

pub use gemini::{GeminiConfig, GeminiModel};
pub use null::NullModel;
