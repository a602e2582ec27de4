//! `lexgate chat`: Single-message or interactive chat.
//!
//! Interactive mode keeps the history locally and sends it with every
//! message, the same way HTTP clients do.

use std::io::{BufRead, Write};

use lexgate_core::ConversationHistory;

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let assistant = super::build_assistant().await?;

    if let Some(msg) = message {
        let outcome = assistant.chat(&msg, ConversationHistory::new()).await;
        println!("{}", outcome.answer.trim());
        return Ok(());
    }

    println!("lexgate chat ({} mode). Type 'exit' to quit.", assistant.mode());

    let stdin = std::io::stdin();
    let mut history = ConversationHistory::new();
    loop {
        print!("\n> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input, "exit" | "quit") {
            break;
        }

        let outcome = assistant.chat(input, history).await;
        println!("\n{}", outcome.answer.trim());
        history = outcome.history;
    }

    Ok(())
}
