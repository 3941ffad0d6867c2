//! One complete test session
//!
//! intro → trials → analysis → insights → history comparison → save

use anyhow::{Context, Result};
use chrono::Timelike;
use rand::Rng;
use std::io::{BufRead, Write};

use crate::clock::Clock;
use crate::config::SessionConfig;
use crate::history::{Baseline, HistoryRecord, HistoryStore};
use crate::report;
use crate::summary::SessionSummary;
use crate::trial::TrialRunner;

/// Run a full session and append it to `store`
///
/// Interruption during the trials returns an error before anything is
/// analyzed or written.
pub fn run_session<C, R, I, W>(
    config: &SessionConfig,
    store: &HistoryStore,
    clock: &mut C,
    rng: &mut R,
    input: &mut I,
    output: &mut W,
) -> Result<SessionSummary>
where
    C: Clock,
    R: Rng,
    I: BufRead,
    W: Write,
{
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid session configuration: {}", e))?;

    report::render_intro(output, config.trials)?;

    let trials_ms = {
        let mut runner = TrialRunner::new(clock, rng, config);
        runner.wait_until_ready(input, output)?;
        runner.run(input, output)?
    };

    let analyzed_at = clock.wall_time();
    let summary = SessionSummary::analyze(&trials_ms, analyzed_at.hour())
        .context("Failed to analyze session")?;

    report::render_results(output, &summary)?;
    report::render_insights(output, &summary)?;

    let history = store.load()?;
    if let Some(baseline) = history
        .as_deref()
        .and_then(|prior| Baseline::compare(prior, summary.average_ms()))
    {
        report::render_baseline(output, &baseline)?;
    }

    let record = HistoryRecord::from_summary(&summary, clock.wall_time());
    store.append(&record)?;
    tracing::info!(
        average_ms = summary.average_ms(),
        trials = summary.trials_ms().len(),
        path = %store.path().display(),
        "session saved"
    );

    report::render_saved(output, store.path())?;
    output.flush()?;

    Ok(summary)
}
