//! Optional AI assistance for snippet metadata.
//!
//! Talks to a locally running Ollama daemon to generate a description and
//! suggested tags for a snippet's code. The feature is best-effort: when no
//! daemon is reachable or the model is missing, callers get an error to
//! report as "assistant unavailable" and carry on. A snippet save never
//! depends on these calls.

use anyhow::{Result, anyhow};
use ollama_rs::{Ollama, generation::completion::request::GenerationRequest, models::ModelOptions};
use once_cell::sync::Lazy;
use std::thread;
use std::time::Duration;
use tokio::runtime::Runtime;

/// Model used for generation, overridable via CODEPOCKET_ASSIST_MODEL.
static ASSIST_MODEL: Lazy<String> = Lazy::new(|| {
    std::env::var("CODEPOCKET_ASSIST_MODEL").unwrap_or_else(|_| "llama3.2".to_string())
});

const ASSIST_TIMEOUT: Duration = Duration::from_secs(60);

/// Asks the model what the code does, phrased as a short documentation
/// paragraph.
pub fn explain_code(code: &str, language: &str) -> Result<String> {
    let prompt = format!(
        "Explain what this {} code does in a short, concise paragraph for a developer's documentation:\n\n{}",
        language, code
    );

    let reply = generate(prompt)?;
    Ok(reply.trim().to_string())
}

/// Asks the model for 3-5 tags for the code, expected back as a JSON array
/// of strings. An unusable reply yields an empty list rather than an error.
pub fn suggest_tags(code: &str) -> Result<Vec<String>> {
    let prompt = format!(
        "Suggest 3-5 keywords or tags for this code snippet. Return as a JSON array of strings:\n\n{}",
        code
    );

    let reply = generate(prompt)?;
    Ok(parse_tag_array(&reply))
}

/// Runs one generation request on a worker thread that owns its own Tokio
/// runtime, handing the result back over a channel so the synchronous
/// caller can bound the wait.
fn generate(prompt: String) -> Result<String> {
    let (sender, receiver) = flume::bounded(1);

    thread::spawn(move || {
        let result = match Runtime::new() {
            Ok(rt) => rt.block_on(async {
                let ollama = Ollama::default();
                let options = ModelOptions::default().temperature(0.2).num_predict(400);
                let request =
                    GenerationRequest::new(ASSIST_MODEL.clone(), prompt).options(options);
                ollama
                    .generate(request)
                    .await
                    .map(|response| response.response)
                    .map_err(|e| format!("{}", e))
            }),
            Err(e) => Err(format!("Runtime error: {}", e)),
        };
        let _ = sender.send(result);
    });

    match receiver.recv_timeout(ASSIST_TIMEOUT) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(error)) => Err(anyhow!(error)),
        Err(_) => Err(anyhow!("assistant timed out")),
    }
}

/// Pulls a JSON string array out of a model reply. Models wrap the array in
/// prose or code fences often enough that the first bracketed region is
/// parsed instead of the reply as a whole.
fn parse_tag_array(reply: &str) -> Vec<String> {
    let Some(start) = reply.find('[') else {
        return Vec::new();
    };
    let Some(end) = reply[start..].find(']') else {
        return Vec::new();
    };

    serde_json::from_str(&reply[start..start + end + 1]).unwrap_or_default()
}
