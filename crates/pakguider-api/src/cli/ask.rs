//! One-shot question command.

use std::time::Instant;

use anyhow::Result;
use console::style;
use serde::Serialize;

use pakguider_core::chat::session::SessionManager;

use crate::cli::chat::renderer::{ChatRenderer, thinking_spinner};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AskOutput {
    pub question: String,
    pub answer: String,
    pub model: String,
    pub response_time_ms: u64,
}

/// Run a single pipeline turn in a throwaway session.
pub async fn answer_once(state: &AppState, question: &str) -> Result<AskOutput> {
    let mut session = SessionManager::new();
    let question = session.resolve_question(Some(question))?;

    let started = Instant::now();
    let answer = state.pipeline.run_turn(&mut session, &question).await;

    Ok(AskOutput {
        question,
        answer,
        model: state.pipeline.settings().model.clone(),
        response_time_ms: started.elapsed().as_millis() as u64,
    })
}

/// `pakguider ask "<question>"`.
///
/// With fail-fast enabled, both providers are probed first and a failure
/// aborts before any question is sent.
pub async fn ask(state: &AppState, question: &str, json: bool) -> Result<()> {
    if state.config.settings.fail_fast {
        state.verify_providers().await?;
    }

    if json {
        let output = answer_once(state, question).await?;
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let spinner = thinking_spinner("searching the travel documents...");
    let output = answer_once(state, question).await;
    spinner.finish_and_clear();
    let output = output?;

    let renderer = ChatRenderer::new();
    println!();
    println!("  {}", style("PakGuider").green().bold());
    for line in renderer.render_final(&output.answer).trim_end().lines() {
        println!("  {line}");
    }
    renderer.print_stats_footer(output.response_time_ms, &output.model);
    println!();
    Ok(())
}
