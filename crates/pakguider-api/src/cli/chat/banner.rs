//! Welcome banner display for chat sessions.

use console::style;

use pakguider_types::chat::EXAMPLE_QUERIES;

/// Print the banner at the start of a chat session.
pub fn print_welcome_banner(model: &str, search_service: &str, session_id: &str) {
    println!();
    println!(
        "  🌏 {}",
        style("Pakistan Tourist Guide Chatbot").green().bold()
    );
    println!(
        "  {}",
        style("Answers from official Government of Pakistan documents").dim()
    );
    println!();
    println!("  {}   {}", style("Model:").bold(), style(model).dim());
    println!("  {}  {}", style("Search:").bold(), style(search_service).dim());
    println!(
        "  {} {}",
        style("Session:").bold(),
        style(&session_id[..8.min(session_id.len())]).dim()
    );
    println!();
    print_examples();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}

/// List the example queries with their `/N` shortcuts.
pub fn print_examples() {
    println!("  {}", style("Try one of these:").bold());
    for (i, query) in EXAMPLE_QUERIES.iter().enumerate() {
        println!("    {}  {}", style(format!("/{}", i + 1)).green(), query);
    }
    println!();
}
