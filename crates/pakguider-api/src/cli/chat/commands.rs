//! Slash command parsing for the chat loop.
//!
//! Commands start with `/`. A bare number (`/1` ... `/5`) asks the matching
//! example query.

use console::style;

#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    Clear,
    Exit,
    /// Show the transcript so far.
    History,
    /// List the example queries.
    Examples,
    /// Ask example query N (1-based, unchecked).
    Example(usize),
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    let cmd = trimmed.strip_prefix('/')?;
    let cmd = cmd.split_whitespace().next().unwrap_or_default().to_lowercase();

    if let Ok(index) = cmd.parse::<usize>() {
        return Some(ChatCommand::Example(index));
    }

    match cmd.as_str() {
        "help" | "h" | "?" => Some(ChatCommand::Help),
        "clear" | "cls" => Some(ChatCommand::Clear),
        "exit" | "quit" | "q" => Some(ChatCommand::Exit),
        "history" => Some(ChatCommand::History),
        "examples" | "ex" => Some(ChatCommand::Examples),
        _ => Some(ChatCommand::Unknown(format!("/{cmd}"))),
    }
}

pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}       {}", style("/1../5").green(), "Ask an example question");
    println!("  {}  {}", style("/examples").green(), "List the example questions");
    println!("  {}   {}", style("/history").green(), "Show the conversation so far");
    println!("  {}     {}", style("/clear").green(), "Clear the screen");
    println!("  {}      {}", style("/help").green(), "Show this help message");
    println!("  {}      {}", style("/exit").green(), "End the chat session");
    println!();
    println!("  {}", style("Ctrl+D to exit").dim());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_help() {
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
        assert_eq!(parse("/h"), Some(ChatCommand::Help));
        assert_eq!(parse("/?"), Some(ChatCommand::Help));
    }

    #[test]
    fn test_parse_exit() {
        assert_eq!(parse("/exit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/QUIT"), Some(ChatCommand::Exit));
        assert_eq!(parse("  /q  "), Some(ChatCommand::Exit));
    }

    #[test]
    fn test_parse_example_shortcuts() {
        assert_eq!(parse("/1"), Some(ChatCommand::Example(1)));
        assert_eq!(parse("/5"), Some(ChatCommand::Example(5)));
        assert_eq!(parse("/9"), Some(ChatCommand::Example(9)));
        assert_eq!(parse("/examples"), Some(ChatCommand::Examples));
    }

    #[test]
    fn test_parse_not_command() {
        assert_eq!(parse("What is the visa policy?"), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse("/foo bar"), Some(ChatCommand::Unknown("/foo".to_string())));
        assert_eq!(parse("/"), Some(ChatCommand::Unknown("/".to_string())));
    }
}
