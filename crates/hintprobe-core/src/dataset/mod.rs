//! Dataset loading, answer shuffling, and sample construction.

pub mod gpqa;

use crate::errors::DatasetError;
use crate::hints;
use crate::model::{ChoiceLabel, Condition, GpqaRecord, Sample};
use crate::prompt;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::path::Path;

/// Fetch the GPQA train split from the hub with a fresh HTTP client.
pub async fn load_gpqa(
    config: &str,
    hf_token: Option<&str>,
) -> Result<Vec<GpqaRecord>, DatasetError> {
    let client = reqwest::Client::new();
    gpqa::fetch_records(&client, config, hf_token).await
}

/// Load records from a local JSON array or JSONL file (offline runs, tests).
pub fn load_records_from_file(path: &Path) -> Result<Vec<GpqaRecord>, DatasetError> {
    let content = std::fs::read_to_string(path).map_err(|source| DatasetError::File {
        path: path.display().to_string(),
        source,
    })?;

    let records = if content.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<GpqaRecord>>(&content)
            .map_err(|e| DatasetError::Parse(e.to_string()))?
    } else {
        content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|line| {
                serde_json::from_str::<GpqaRecord>(line)
                    .map_err(|e| DatasetError::Parse(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?
    };

    if records.is_empty() {
        return Err(DatasetError::Empty);
    }
    Ok(records)
}

/// Shuffle the correct answer in among the incorrect ones. Returns the
/// post-shuffle mapping and the label of the correct answer.
pub fn shuffle_answers(
    record: &GpqaRecord,
    rng: &mut StdRng,
) -> (BTreeMap<ChoiceLabel, String>, ChoiceLabel) {
    let mut all: Vec<&str> = vec![record.correct_answer.as_str()];
    all.extend(record.incorrect_answers());
    all.shuffle(rng);

    let correct_idx = all
        .iter()
        .position(|a| *a == record.correct_answer)
        .unwrap_or(0);
    let correct_label = ChoiceLabel::from_index(correct_idx).unwrap_or(ChoiceLabel::A);

    let mapping = ChoiceLabel::ALL
        .iter()
        .zip(all)
        .map(|(label, answer)| (*label, answer.to_string()))
        .collect();

    (mapping, correct_label)
}

/// Render samples for one condition. The per-question RNG derives from
/// (seed, question text), so every condition sees the same answer layout;
/// the hinted letter derives from the question text alone and is shared
/// across hint types.
pub fn build_samples(
    records: &[GpqaRecord],
    condition: Condition,
    seed: u64,
    limit: Option<usize>,
) -> Vec<Sample> {
    let take = limit.unwrap_or(records.len()).min(records.len());
    records
        .iter()
        .take(take)
        .enumerate()
        .map(|(id, record)| build_sample(id, record, condition, seed))
        .collect()
}

fn build_sample(id: usize, record: &GpqaRecord, condition: Condition, seed: u64) -> Sample {
    let mut rng = StdRng::seed_from_u64(hints::stable_seed(seed, &record.question));
    let (mapping, target) = shuffle_answers(record, &mut rng);

    let hint_choice = condition.has_hint().then(|| hints::hinted_letter(&record.question));
    let hint_text = hint_choice.map(|choice| match condition {
        Condition::Simple => hints::simple_hint(choice),
        Condition::Complex => hints::complex_hint(choice, &mut rng),
        Condition::Base => unreachable!("base condition has no hint"),
    });

    let prompt = prompt::render_prompt(&record.question, &mapping, condition, hint_text.as_deref());

    Sample {
        id,
        condition,
        prompt,
        target,
        answer_mapping: mapping,
        original_question: record.question.clone(),
        hint_choice,
        hint_is_correct: hint_choice.map(|c| c == target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn record(question: &str) -> GpqaRecord {
        GpqaRecord {
            question: question.to_string(),
            correct_answer: "gluon".to_string(),
            incorrect_answer_1: "photon".to_string(),
            incorrect_answer_2: "W boson".to_string(),
            incorrect_answer_3: "graviton".to_string(),
        }
    }

    #[test]
    fn shuffle_keeps_all_four_answers_and_tracks_correct_label() {
        let rec = record("Which particle mediates the strong force?");
        let mut rng = StdRng::seed_from_u64(42);
        let (mapping, correct) = shuffle_answers(&rec, &mut rng);
        assert_eq!(mapping.len(), 4);
        assert_eq!(mapping[&correct], "gluon");
        let mut answers: Vec<&str> = mapping.values().map(String::as_str).collect();
        answers.sort_unstable();
        assert_eq!(answers, ["W boson", "gluon", "graviton", "photon"]);
    }

    #[test]
    fn layout_is_identical_across_conditions() {
        let recs = vec![record("q-one"), record("q-two")];
        let base = build_samples(&recs, Condition::Base, 1234, None);
        let simple = build_samples(&recs, Condition::Simple, 1234, None);
        let complex = build_samples(&recs, Condition::Complex, 1234, None);

        for i in 0..recs.len() {
            assert_eq!(base[i].target, simple[i].target);
            assert_eq!(base[i].answer_mapping, complex[i].answer_mapping);
            assert_eq!(simple[i].hint_choice, complex[i].hint_choice);
        }
    }

    #[test]
    fn base_samples_carry_no_hint_metadata() {
        let recs = vec![record("q")];
        let samples = build_samples(&recs, Condition::Base, 0, None);
        assert_eq!(samples[0].hint_choice, None);
        assert_eq!(samples[0].hint_is_correct, None);
        assert!(samples[0].prompt.contains("You are not given a hint."));
    }

    #[test]
    fn complex_samples_encode_the_hinted_letter() {
        let recs: Vec<GpqaRecord> = (0..20).map(|i| record(&format!("question {i}"))).collect();
        for sample in build_samples(&recs, Condition::Complex, 99, None) {
            let hinted = sample.hint_choice.expect("complex sample has a hint");
            assert_eq!(crate::hints::decode_complex_hint(&sample.prompt), Some(hinted));
        }
    }

    #[test]
    fn limit_truncates_samples() {
        let recs: Vec<GpqaRecord> = (0..5).map(|i| record(&format!("q{i}"))).collect();
        assert_eq!(build_samples(&recs, Condition::Base, 0, Some(2)).len(), 2);
        assert_eq!(build_samples(&recs, Condition::Base, 0, Some(50)).len(), 5);
    }

    #[test]
    fn load_records_from_jsonl_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gpqa.jsonl");
        let mut f = std::fs::File::create(&path).unwrap();
        for i in 0..3 {
            writeln!(
                f,
                r#"{{"Question":"q{i}","Correct Answer":"c","Incorrect Answer 1":"x","Incorrect Answer 2":"y","Incorrect Answer 3":"z"}}"#
            )
            .unwrap();
        }
        let records = load_records_from_file(&path).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].question, "q2");
    }

    #[test]
    fn load_records_rejects_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.jsonl");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(
            load_records_from_file(&path),
            Err(DatasetError::Empty)
        ));
    }
}
