//! `lexgate gateway`: Start the HTTP API server.

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config()?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("lexgate gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!(
        "   Mode:      {}",
        if config.is_model_configured() { "live" } else { "degraded (no API key)" }
    );

    lexgate_gateway::start(config).await?;

    Ok(())
}
