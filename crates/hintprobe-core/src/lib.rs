//! Core library for the GPQA hint-influence experiment harness.
//!
//! The experiment poses GPQA multiple-choice questions to a candidate model
//! under three prompt conditions (no hint, an authority hint, an encoded
//! mod-4 hint), then scores each trial for the extracted choice, correctness,
//! the hinted letter, and judge-assessed hint usage.

pub mod config;
pub mod dataset;
pub mod engine;
pub mod errors;
pub mod hints;
pub mod judge;
pub mod model;
pub mod prompt;
pub mod providers;
pub mod report;
pub mod scorer;
