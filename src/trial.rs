//! Trial runner: randomized wait, go-cue, and response timing
//!
//! Each trial sleeps for a random interval, prints the go-cue, and measures
//! how long the user takes to confirm on input. Closing input before all
//! trials finish aborts the run; no partial results are returned.

use rand::Rng;
use std::io::{self, BufRead, Write};
use std::time::{Duration, TryFromFloatSecsError};
use thiserror::Error;

use crate::clock::{as_millis_f64, Clock};
use crate::config::SessionConfig;

/// Cue shown when the user should respond
pub const GO_CUE: &str = ">>> GO! <<<";

/// Responses under this many ms get "Excellent" feedback
pub const EXCELLENT_MS: f64 = 200.0;

/// Responses under this many ms get "Good" feedback
pub const GOOD_MS: f64 = 270.0;

/// Errors that end a run of trials
#[derive(Error, Debug)]
pub enum TrialError {
    #[error("Session interrupted after {completed} of {total} trials")]
    Interrupted { completed: usize, total: usize },

    #[error("Failed to read response after {completed} of {total} trials")]
    Input {
        completed: usize,
        total: usize,
        #[source]
        source: io::Error,
    },

    #[error("Cannot wait {secs} s before the cue")]
    Delay {
        secs: f64,
        #[source]
        source: TryFromFloatSecsError,
    },

    #[error("Failed to write to console")]
    Output(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, TrialError>;

/// Immediate per-trial feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Excellent,
    Good,
    Plain,
}

impl Feedback {
    pub fn from_ms(reaction_ms: f64) -> Self {
        if reaction_ms < EXCELLENT_MS {
            Feedback::Excellent
        } else if reaction_ms < GOOD_MS {
            Feedback::Good
        } else {
            Feedback::Plain
        }
    }

    /// Console line for a measured reaction
    pub fn render(&self, reaction_ms: f64) -> String {
        match self {
            Feedback::Excellent => format!("⚡ {:.0} ms - Excellent!", reaction_ms),
            Feedback::Good => format!("✓  {:.0} ms - Good", reaction_ms),
            Feedback::Plain => format!("   {:.0} ms", reaction_ms),
        }
    }
}

/// Runs a fixed number of timed trials against an injected clock and RNG
pub struct TrialRunner<'a, C: Clock, R: Rng> {
    clock: &'a mut C,
    rng: &'a mut R,
    trials: usize,
    min_delay_secs: f64,
    max_delay_secs: f64,
}

impl<'a, C: Clock, R: Rng> TrialRunner<'a, C, R> {
    /// Create a runner; `config` is expected to be validated
    pub fn new(clock: &'a mut C, rng: &'a mut R, config: &SessionConfig) -> Self {
        Self {
            clock,
            rng,
            trials: config.trials,
            min_delay_secs: config.min_delay_secs,
            max_delay_secs: config.max_delay_secs,
        }
    }

    /// Prompt once and block until the user confirms they are ready
    pub fn wait_until_ready<I: BufRead, W: Write>(
        &mut self,
        input: &mut I,
        output: &mut W,
    ) -> Result<()> {
        write!(output, "Press Enter when you're ready to start...")?;
        output.flush()?;
        self.await_response(input, 0)
    }

    /// Run every trial and return reaction times in milliseconds, in order
    pub fn run<I: BufRead, W: Write>(
        &mut self,
        input: &mut I,
        output: &mut W,
    ) -> Result<Vec<f64>> {
        let mut results = Vec::new();

        for index in 0..self.trials {
            let reaction_ms = self.run_trial(index, input, output)?;
            results.push(reaction_ms);
        }

        Ok(results)
    }

    fn run_trial<I: BufRead, W: Write>(
        &mut self,
        index: usize,
        input: &mut I,
        output: &mut W,
    ) -> Result<f64> {
        writeln!(output, "\n{}", "─".repeat(30))?;
        writeln!(output, "Trial {} of {}", index + 1, self.trials)?;
        writeln!(output, "Waiting...")?;
        output.flush()?;

        let delay = self.random_delay()?;
        tracing::debug!(
            trial = index + 1,
            delay_ms = delay.as_millis() as u64,
            "waiting before cue"
        );
        self.clock.sleep(delay);

        writeln!(output, "\n{}", GO_CUE)?;
        output.flush()?;

        let cue = self.clock.now();
        self.await_response(input, index)?;
        let reaction_ms = as_millis_f64(self.clock.now().saturating_sub(cue));

        tracing::debug!(trial = index + 1, reaction_ms, "response recorded");
        writeln!(output, "{}", Feedback::from_ms(reaction_ms).render(reaction_ms))?;

        Ok(reaction_ms)
    }

    /// Uniform sample from the configured delay window
    fn random_delay(&mut self) -> Result<Duration> {
        let secs = if self.max_delay_secs > self.min_delay_secs {
            self.rng.gen_range(self.min_delay_secs..=self.max_delay_secs)
        } else {
            self.min_delay_secs
        };
        Duration::try_from_secs_f64(secs).map_err(|source| TrialError::Delay { secs, source })
    }

    fn await_response<I: BufRead>(&mut self, input: &mut I, completed: usize) -> Result<()> {
        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) => Err(TrialError::Interrupted {
                completed,
                total: self.trials,
            }),
            Ok(_) => Ok(()),
            Err(source) => Err(TrialError::Input {
                completed,
                total: self.trials,
                source,
            }),
        }
    }
}
