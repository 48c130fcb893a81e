//! Provider connectivity check command.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use pakguider_infra::config::AppConfig;
use pakguider_infra::probe::{ProbeOutcome, probe_providers};

fn outcome_json(outcome: &ProbeOutcome) -> serde_json::Value {
    serde_json::json!({
        "provider": outcome.provider,
        "target": outcome.target,
        "ok": outcome.is_ok(),
        "latency_ms": outcome.latency.as_millis() as u64,
        "error": outcome.error,
    })
}

/// `pakguider check`: probe both providers, print a report, and fail if
/// either is unreachable.
pub async fn check(config: &AppConfig, json: bool) -> Result<()> {
    let outcomes = probe_providers(config).await;

    if json {
        let report: Vec<_> = outcomes.iter().map(outcome_json).collect();
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(config, &outcomes);
    }

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} providers unreachable", outcomes.len());
    }
    Ok(())
}

fn print_table(config: &AppConfig, outcomes: &[ProbeOutcome]) {
    println!();
    match &config.source {
        Some(path) => println!(
            "  {} {}",
            style("Config:").bold(),
            style(path.display()).dim()
        ),
        None => println!(
            "  {} {}",
            style("Config:").bold(),
            style("defaults + environment").dim()
        ),
    }
    println!();

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Provider").fg(Color::White),
        Cell::new("Target").fg(Color::White),
        Cell::new("Status").fg(Color::White),
        Cell::new("Latency").fg(Color::White),
    ]);

    for outcome in outcomes {
        let status = match &outcome.error {
            None => Cell::new("ok").fg(Color::Green),
            Some(err) => Cell::new(err).fg(Color::Red),
        };
        table.add_row(vec![
            Cell::new(outcome.provider),
            Cell::new(&outcome.target),
            status,
            Cell::new(format!("{} ms", outcome.latency.as_millis())),
        ]);
    }

    println!("{table}");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_outcome_json() {
        let outcome = ProbeOutcome {
            provider: "mistral",
            target: "mistral-large-latest".to_string(),
            latency: Duration::from_millis(42),
            error: Some("authentication failed".to_string()),
        };
        let value = outcome_json(&outcome);
        assert_eq!(value["ok"], false);
        assert_eq!(value["latency_ms"], 42);
        assert_eq!(value["error"], "authentication failed");
    }

    #[tokio::test]
    async fn test_check_fails_when_unconfigured() {
        let mut config = AppConfig::default();
        config.settings.chat.base_url = "http://127.0.0.1:1".to_string();
        let err = check(&config, true).await.unwrap_err();
        assert_eq!(err.to_string(), "2 of 2 providers unreachable");
    }
}
