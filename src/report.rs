//! Console rendering for a test session
//!
//! All functions write to any [`Write`] so output can be captured in tests.

use std::io::{self, Write};
use std::path::Path;

use crate::history::{Baseline, BaselineVerdict};
use crate::summary::SessionSummary;
use crate::trial::GO_CUE;

/// Milliseconds represented by one histogram bar character
pub const MS_PER_BAR: f64 = 20.0;

const BANNER_WIDTH: usize = 50;

fn banner<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out, "\n{}", "=".repeat(BANNER_WIDTH))?;
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", "=".repeat(BANNER_WIDTH))
}

/// Bar of `floor(ms / 20)` block characters
pub fn histogram_bar(reaction_ms: f64) -> String {
    let len = (reaction_ms / MS_PER_BAR).floor().max(0.0) as usize;
    "█".repeat(len)
}

/// Title and instructions shown before the first trial
pub fn render_intro<W: Write>(out: &mut W, trials: usize) -> io::Result<()> {
    banner(out, "🧠  REACTION TIME TEST  🧠")?;
    writeln!(out, "\nThis test measures your psychomotor vigilance:")?;
    writeln!(out, "the speed of your brain's response to visual stimuli.\n")?;
    writeln!(out, "You'll complete {} trials.", trials)?;
    writeln!(out, "When you see '{}', press Enter immediately.\n", GO_CUE)
}

/// One histogram row per trial
pub fn render_histogram<W: Write>(out: &mut W, trials_ms: &[f64]) -> io::Result<()> {
    writeln!(out, "\nYour reaction times:")?;
    for (index, ms) in trials_ms.iter().enumerate() {
        writeln!(out, "  Trial {}: {} {:.0}ms", index + 1, histogram_bar(*ms), ms)?;
    }
    Ok(())
}

/// Results banner, histogram, and numeric summary
pub fn render_results<W: Write>(out: &mut W, summary: &SessionSummary) -> io::Result<()> {
    banner(out, "📊  RESULTS")?;
    render_histogram(out, summary.trials_ms())?;

    writeln!(out, "\n  Average:  {:.1} ms", summary.average_ms())?;
    writeln!(out, "  Fastest:  {:.1} ms", summary.fastest_ms())?;
    writeln!(out, "  Slowest:  {:.1} ms", summary.slowest_ms())?;

    let percentile = summary.percentile();
    writeln!(out, "\n  Percentile: {}th", percentile.rank)?;
    writeln!(out, "  → {}", percentile.description)
}

/// Analysis banner and insight list
pub fn render_insights<W: Write>(out: &mut W, summary: &SessionSummary) -> io::Result<()> {
    banner(out, "🔬  ANALYSIS")?;
    for insight in summary.insights() {
        writeln!(out, "\n  {}", insight)?;
    }
    Ok(())
}

/// Comparison with the personal mean of prior sessions
pub fn render_baseline<W: Write>(out: &mut W, baseline: &Baseline) -> io::Result<()> {
    writeln!(
        out,
        "\n  📈 Personal history ({} previous sessions):",
        baseline.sessions
    )?;
    writeln!(
        out,
        "     Your usual average: {:.1} ms",
        baseline.personal_average_ms
    )?;

    match baseline.verdict {
        BaselineVerdict::Faster => writeln!(
            out,
            "     Today: {:.0} ms FASTER than usual 🎉",
            baseline.delta_ms.abs()
        ),
        BaselineVerdict::Slower => writeln!(
            out,
            "     Today: {:.0} ms slower than usual",
            baseline.delta_ms
        ),
        BaselineVerdict::Consistent => writeln!(out, "     Today: consistent with your baseline"),
    }
}

/// Persistence confirmation and closing banner
pub fn render_saved<W: Write>(out: &mut W, path: &Path) -> io::Result<()> {
    writeln!(out, "\n✓ Results saved to {}", path.display())?;
    banner(out, "Test complete!")?;
    writeln!(out)
}
