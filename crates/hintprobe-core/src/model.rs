use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One of the four answer slots in a GPQA multiple-choice question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChoiceLabel {
    A,
    B,
    C,
    D,
}

impl ChoiceLabel {
    pub const ALL: [ChoiceLabel; 4] = [
        ChoiceLabel::A,
        ChoiceLabel::B,
        ChoiceLabel::C,
        ChoiceLabel::D,
    ];

    /// A=0, B=1, C=2, D=3.
    pub fn index(self) -> usize {
        match self {
            ChoiceLabel::A => 0,
            ChoiceLabel::B => 1,
            ChoiceLabel::C => 2,
            ChoiceLabel::D => 3,
        }
    }

    pub fn from_index(idx: usize) -> Option<ChoiceLabel> {
        Self::ALL.get(idx).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChoiceLabel::A => "A",
            ChoiceLabel::B => "B",
            ChoiceLabel::C => "C",
            ChoiceLabel::D => "D",
        }
    }
}

impl fmt::Display for ChoiceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChoiceLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(ChoiceLabel::A),
            "B" => Ok(ChoiceLabel::B),
            "C" => Ok(ChoiceLabel::C),
            "D" => Ok(ChoiceLabel::D),
            other => Err(format!("not a choice label: {other}")),
        }
    }
}

/// Outcome of answer extraction. `NotFound` is a sentinel, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extracted {
    Choice(ChoiceLabel),
    NotFound,
}

impl Extracted {
    pub fn choice(self) -> Option<ChoiceLabel> {
        match self {
            Extracted::Choice(c) => Some(c),
            Extracted::NotFound => None,
        }
    }

    /// Log representation: the letter, or "NA" when nothing was extracted.
    pub fn as_log_str(self) -> &'static str {
        match self {
            Extracted::Choice(c) => c.as_str(),
            Extracted::NotFound => "NA",
        }
    }
}

/// The three prompt conditions of the experiment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    #[default]
    Base,
    Simple,
    Complex,
}

impl Condition {
    pub fn as_str(self) -> &'static str {
        match self {
            Condition::Base => "base",
            Condition::Simple => "simple",
            Condition::Complex => "complex",
        }
    }

    pub fn has_hint(self) -> bool {
        !matches!(self, Condition::Base)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base" => Ok(Condition::Base),
            "simple" => Ok(Condition::Simple),
            "complex" => Ok(Condition::Complex),
            other => Err(format!("unknown condition: {other} (expected base|simple|complex)")),
        }
    }
}

/// A raw GPQA question record as published on the hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpqaRecord {
    #[serde(rename = "Question")]
    pub question: String,
    #[serde(rename = "Correct Answer")]
    pub correct_answer: String,
    #[serde(rename = "Incorrect Answer 1")]
    pub incorrect_answer_1: String,
    #[serde(rename = "Incorrect Answer 2")]
    pub incorrect_answer_2: String,
    #[serde(rename = "Incorrect Answer 3")]
    pub incorrect_answer_3: String,
}

impl GpqaRecord {
    pub fn incorrect_answers(&self) -> [&str; 3] {
        [
            &self.incorrect_answer_1,
            &self.incorrect_answer_2,
            &self.incorrect_answer_3,
        ]
    }
}

/// A fully rendered sample: prompt text plus everything the scorers need.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    pub id: usize,
    pub condition: Condition,
    /// Final prompt sent to the candidate model (question, choices, hint
    /// block, answer-format instruction).
    pub prompt: String,
    /// Letter of the correct answer after shuffling.
    pub target: ChoiceLabel,
    /// Letter -> answer text, post-shuffle.
    pub answer_mapping: BTreeMap<ChoiceLabel, String>,
    /// Question stem without choices or hint.
    pub original_question: String,
    /// Letter the hint points at; `None` in the base condition.
    pub hint_choice: Option<ChoiceLabel>,
    pub hint_is_correct: Option<bool>,
}

/// Completion returned by an LLM provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
    pub meta: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    Ok,
    Error,
}

/// One scored (sample, epoch) trial. Created once, appended to the run log,
/// never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleResultRow {
    pub sample_id: usize,
    pub epoch: u32,
    pub status: RowStatus,
    pub extracted: Extracted,
    pub correct: bool,
    /// Letter the hint pointed at ("NONE" in base condition logs).
    pub hint_choice: Option<ChoiceLabel>,
    /// Judge confidence in [0, 1] that the model considered the hint;
    /// `None` when the judge gave no usable answer.
    pub hint_usage: Option<f64>,
    pub message: String,
    pub duration_ms: Option<u64>,
    pub details: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_label_index_roundtrip() {
        for label in ChoiceLabel::ALL {
            assert_eq!(ChoiceLabel::from_index(label.index()), Some(label));
        }
        assert_eq!(ChoiceLabel::from_index(4), None);
    }

    #[test]
    fn choice_label_parses_case_insensitively() {
        assert_eq!("a".parse::<ChoiceLabel>().unwrap(), ChoiceLabel::A);
        assert_eq!(" D ".parse::<ChoiceLabel>().unwrap(), ChoiceLabel::D);
        assert!("E".parse::<ChoiceLabel>().is_err());
    }

    #[test]
    fn condition_parses_and_displays() {
        assert_eq!("complex".parse::<Condition>().unwrap(), Condition::Complex);
        assert_eq!(Condition::Simple.to_string(), "simple");
        assert!("hintless".parse::<Condition>().is_err());
        assert!(!Condition::Base.has_hint());
        assert!(Condition::Simple.has_hint());
    }

    #[test]
    fn extracted_log_str() {
        assert_eq!(Extracted::Choice(ChoiceLabel::B).as_log_str(), "B");
        assert_eq!(Extracted::NotFound.as_log_str(), "NA");
    }
}
