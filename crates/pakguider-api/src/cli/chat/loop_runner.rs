//! Main chat loop orchestration.
//!
//! Runs the provider probe under the one-time loading indicator, prints the
//! greeting, then alternates between reading input and running pipeline
//! turns until the user exits.

use std::time::Instant;

use console::style;
use tracing::info;

use pakguider_core::chat::session::SessionManager;
use pakguider_types::error::SessionError;
use pakguider_types::llm::MessageRole;

use crate::state::AppState;

use super::banner::{print_examples, print_welcome_banner};
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::{ChatRenderer, thinking_spinner};

/// Run the interactive chat loop.
pub async fn run_chat_loop(state: &AppState) -> anyhow::Result<()> {
    let mut session = SessionManager::new();

    if session.mark_loading_shown() {
        let spinner = thinking_spinner("🌏 Loading PakGuider");
        let verified = state.verify_providers().await;
        spinner.finish_and_clear();
        verified?;
    }

    let session_id = session.session().id.to_string();
    let search_service = state.config.settings.search.service_ref().to_string();
    print_welcome_banner(&state.pipeline.settings().model, &search_service, &session_id);

    let renderer = ChatRenderer::new();
    if let Some(greeting) = session.conversation().last() {
        print_answer(&renderer, &greeting.content);
    }

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) =
        ChatInput::new(prompt).map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => break,
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Message(text) if text.is_empty() => continue,
            InputEvent::Message(text) => text,
        };

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Clear => chat_input.clear(),
                ChatCommand::Exit => break,
                ChatCommand::Examples => {
                    println!();
                    print_examples();
                }
                ChatCommand::History => print_history(&session),
                ChatCommand::Example(index) => match session.prefill_example(index) {
                    Ok(query) => {
                        println!("\n  {} {}", style("You >").green().bold(), query);
                        ask(state, &renderer, &mut session, None).await;
                    }
                    Err(e) => println!("\n  {} {e}\n", style("?").yellow().bold()),
                },
                ChatCommand::Unknown(name) => {
                    println!(
                        "\n  {} Unknown command: {}. Type /help for available commands.\n",
                        style("?").yellow().bold(),
                        style(name).dim()
                    );
                }
            }
            continue;
        }

        ask(state, &renderer, &mut session, Some(&text)).await;
    }

    session.mark_completed();
    info!(session_id = %session_id, turns = session.turn_count(), "Chat session ended");
    println!(
        "\n  {} ({} questions answered)",
        style("Session ended.").dim(),
        session.turn_count()
    );
    Ok(())
}

/// Run one turn and print the answer. Provider failures arrive as the
/// fallback text, so the only error left is an unusable question.
async fn ask(
    state: &AppState,
    renderer: &ChatRenderer,
    session: &mut SessionManager,
    typed: Option<&str>,
) {
    let question = match session.resolve_question(typed) {
        Ok(q) => q,
        Err(SessionError::EmptyQuestion) => return,
        Err(e) => {
            println!("\n  {} {e}\n", style("!").red().bold());
            return;
        }
    };

    let spinner = thinking_spinner("searching the travel documents...");
    let started = Instant::now();
    let answer = state.pipeline.run_turn(session, &question).await;
    spinner.finish_and_clear();

    print_answer(renderer, &answer);
    renderer.print_stats_footer(
        started.elapsed().as_millis() as u64,
        &state.pipeline.settings().model,
    );
    println!();
}

fn print_answer(renderer: &ChatRenderer, text: &str) {
    println!("\n  {}", style("PakGuider").green().bold());
    for line in renderer.render_final(text).trim_end().lines() {
        println!("  {line}");
    }
}

fn print_history(session: &SessionManager) {
    println!();
    for msg in session.conversation().messages() {
        let label = match msg.role {
            MessageRole::User => style("You").green().bold(),
            _ => style("PakGuider").cyan().bold(),
        };
        let preview: String = if msg.content.chars().count() > 100 {
            let head: String = msg.content.chars().take(97).collect();
            format!("{head}...")
        } else {
            msg.content.clone()
        };
        println!("  {label} {}", preview.replace('\n', " "));
    }
    println!();
}
