//! `lexgate search`: Answer a legal question from the document store.

pub async fn run(
    question: String,
    context: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let assistant = super::build_assistant().await?;
    let outcome = assistant.legal_search(&question, context.as_deref()).await;

    println!("{}", outcome.answer.trim());

    if !outcome.sources.is_empty() {
        println!("\nSources:");
        for (i, source) in outcome.sources.iter().enumerate() {
            println!("  {}. {} (score {:.4})", i + 1, source.filename, source.score);
            println!("     {}", source.excerpt);
        }
    }
    eprintln!("\n[{}] {}", outcome.mode, outcome.message);

    Ok(())
}
