//! OpenAI client construction shared by the transcription and extraction providers.

use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Timeout for OpenAI API requests (5 minutes).
///
/// Audio uploads for transcription can take minutes on slow links; the
/// reqwest default would cut them off.
const REQUEST_TIMEOUT_SECS: u64 = 300;

/// Create an OpenAI client with an upload-friendly timeout.
pub fn create_client() -> Client<OpenAIConfig> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .expect("Failed to create HTTP client");

    Client::with_config(OpenAIConfig::default()).with_http_client(http_client)
}
