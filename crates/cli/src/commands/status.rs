//! `lexgate status`: Show configuration and answer mode.

use lexgate_retrieval::DocumentStore;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;
    let store = DocumentStore::load(&config.retrieval.data_dir);

    println!("lexgate status");
    println!("==============");
    println!("  Model:        {}", config.model);
    println!(
        "  API key:      {}",
        if config.is_model_configured() { "configured" } else { "missing" }
    );
    println!(
        "  Mode:         {}",
        if config.is_model_configured() { "LIVE" } else { "DEGRADED" }
    );
    println!("  Temperature:  {}", config.upstream.temperature);
    println!(
        "  Upstream:     {}s timeout, {} attempt(s)",
        config.upstream.timeout_secs, config.upstream.max_attempts
    );
    println!("  Gateway:      {}:{}", config.gateway.host, config.gateway.port);
    println!("  Data dir:     {}", config.retrieval.data_dir.display());
    println!(
        "  Documents:    {}{}",
        store.len(),
        if store.is_fallback() { " (built-in fallback)" } else { "" }
    );
    println!(
        "  Vectors:      {:?}, top_k {}",
        config.retrieval.vector_source, config.retrieval.top_k
    );
    println!("  History:      last {} turns", config.assistant.history_window);

    if !config.is_model_configured() {
        println!("\n  Set GEMINI_API_KEY to enable live answers");
    }

    Ok(())
}
