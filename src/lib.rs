//! reaction-time - command-line psychomotor vigilance test
//!
//! Times keypress responses to a visual cue across several trials, compares
//! the session against population norms and the user's own history, and
//! appends the result to a local CSV log.

pub mod cli;
pub mod clock;
pub mod config;
pub mod history;
pub mod report;
pub mod session;
pub mod summary;
pub mod testing;
pub mod trial;
