//! `lexgate generate`: Draft a legal document.

use lexgate_core::GenerationParameters;

/// Parse one `key=value` argument.
///
/// The value is kept as a JSON string; only the first `=` splits.
pub fn parse_param(raw: &str) -> Result<(String, serde_json::Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty parameter name in '{raw}'"));
    }

    Ok((key.to_string(), serde_json::Value::String(value.to_string())))
}

pub async fn run(
    document_type: String,
    params: Vec<(String, serde_json::Value)>,
) -> Result<(), Box<dyn std::error::Error>> {
    let assistant = super::build_assistant().await?;
    let parameters: GenerationParameters = params.into_iter().collect();

    let outcome = assistant.generate_document(&document_type, &parameters).await;

    println!("{}", outcome.document.trim());
    eprintln!("\n[{}] {}", outcome.mode, outcome.message);

    Ok(())
}
