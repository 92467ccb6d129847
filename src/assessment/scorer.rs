//! Questionnaire scoring
//!
//! 25 ordinal answers become a total, a percentage, a severity tier and one
//! percentage per category.

use super::catalog::{Category, MAX_ANSWER, QUESTION_COUNT};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Format used for report timestamps in the results collection
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssessmentError {
    #[error("Expected {expected} answers, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error("Answer {value} for question {question} is outside 0..={max}")]
    OutOfRange { question: usize, value: i64, max: u8 },
}

/// A validated, complete answer sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answers([u8; QUESTION_COUNT]);

impl Answers {
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn total(&self) -> u32 {
        self.0.iter().map(|&a| u32::from(a)).sum()
    }
}

impl TryFrom<&[i64]> for Answers {
    type Error = AssessmentError;

    fn try_from(values: &[i64]) -> Result<Self, Self::Error> {
        if values.len() != QUESTION_COUNT {
            return Err(AssessmentError::WrongLength {
                expected: QUESTION_COUNT,
                actual: values.len(),
            });
        }

        let mut answers = [0u8; QUESTION_COUNT];
        for (question, (&value, slot)) in values.iter().zip(answers.iter_mut()).enumerate() {
            *slot = u8::try_from(value)
                .ok()
                .filter(|&v| v <= MAX_ANSWER)
                .ok_or(AssessmentError::OutOfRange {
                    question,
                    value,
                    max: MAX_ANSWER,
                })?;
        }
        Ok(Self(answers))
    }
}

/// Overall severity derived from the percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeverityTier {
    Good,
    MildStress,
    ModerateStress,
    HighStress,
    SevereStress,
}

impl SeverityTier {
    /// Half-open breakpoints, lower bound inclusive
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage < 20.0 {
            SeverityTier::Good
        } else if percentage < 40.0 {
            SeverityTier::MildStress
        } else if percentage < 60.0 {
            SeverityTier::ModerateStress
        } else if percentage < 80.0 {
            SeverityTier::HighStress
        } else {
            SeverityTier::SevereStress
        }
    }

    /// Advice shown with the result
    pub fn narrative(self) -> &'static str {
        match self {
            SeverityTier::Good => "Kesehatan mental Anda tampaknya dalam kondisi baik. Tetap jaga keseimbangan hidup dan rutinitas sehat Anda.",
            SeverityTier::MildStress => "Anda mungkin mengalami tingkat stres atau kecemasan ringan. Pertimbangkan untuk meningkatkan kegiatan self-care dan relaksasi.",
            SeverityTier::ModerateStress => "Anda mungkin mengalami tingkat stres atau kecemasan sedang. Disarankan untuk berbicara dengan teman, keluarga, atau konselor tentang perasaan Anda.",
            SeverityTier::HighStress => "Anda mungkin mengalami tingkat stres atau kecemasan yang cukup tinggi. Sangat disarankan untuk berkonsultasi dengan profesional kesehatan mental.",
            SeverityTier::SevereStress => "Hasil tes menunjukkan tingkat stres atau kecemasan yang sangat tinggi. Sangat penting untuk segera mencari bantuan profesional kesehatan mental.",
        }
    }
}

/// Outcome of one completed assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub total_score: u32,
    pub percentage: f64,
    pub severity_tier: SeverityTier,
    /// Percentage per category, keyed by display name when serialized
    pub category_scores: BTreeMap<Category, f64>,
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
}

/// Score a raw answer vector, stamped with the current local time
#[cfg(test)]
pub fn score(answers: &[i64]) -> Result<ScoreReport, AssessmentError> {
    let answers = Answers::try_from(answers)?;
    Ok(score_answers(&answers, Local::now().naive_local()))
}

/// Score an already validated sheet
pub fn score_answers(answers: &Answers, at: NaiveDateTime) -> ScoreReport {
    let total_score = answers.total();
    let max_score = count_to_f64(QUESTION_COUNT) * f64::from(MAX_ANSWER);
    let percentage = 100.0 * f64::from(total_score) / max_score;

    let category_scores = Category::ALL
        .into_iter()
        .map(|category| (category, category_percentage(answers, category)))
        .collect();

    ScoreReport {
        total_score,
        percentage,
        severity_tier: SeverityTier::from_percentage(percentage),
        category_scores,
        timestamp: at,
    }
}

/// Mean answer over the category's questions, normalized to 0..=100.
/// The denominator is the category's own question count.
fn category_percentage(answers: &Answers, category: Category) -> f64 {
    let indices = category.question_indices();
    let sum: u32 = indices
        .iter()
        .map(|&i| u32::from(answers.as_slice()[i]))
        .sum();
    let mean = f64::from(sum) / count_to_f64(indices.len());
    100.0 * mean / f64::from(MAX_ANSWER)
}

/// Question and report counts stay far below 2^52
#[allow(clippy::cast_precision_loss)]
pub(crate) fn count_to_f64(count: usize) -> f64 {
    count as f64
}

mod timestamp_format {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(at: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&at.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}
