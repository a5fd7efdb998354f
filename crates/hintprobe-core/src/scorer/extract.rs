//! Choice extraction from candidate completions.

use crate::model::{ChoiceLabel, Extracted};
use regex::Regex;
use std::sync::OnceLock;

fn tagged_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)<answer>\s*([A-D])\s*</answer>").expect("tagged answer regex")
    })
}

fn bare_letter_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b([A-Da-d])\b").expect("bare letter regex"))
}

/// Extract the chosen letter from a completion. The tagged format wins;
/// otherwise the last standalone A-D is taken as the final answer. Total:
/// always one of {A, B, C, D, NotFound}.
pub fn extract_answer(text: &str) -> Extracted {
    if let Some(caps) = tagged_re().captures(text) {
        if let Ok(label) = caps[1].parse::<ChoiceLabel>() {
            return Extracted::Choice(label);
        }
    }

    let last = bare_letter_re()
        .captures_iter(text)
        .last()
        .and_then(|caps| caps[1].parse::<ChoiceLabel>().ok());

    match last {
        Some(label) => Extracted::Choice(label),
        None => Extracted::NotFound,
    }
}
