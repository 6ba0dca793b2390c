//! Implementation vs. sustainment classification.
//!
//! Tasks split into two buckets by keyword matching over their phase and
//! epic text: implementation work is calendar-scheduled, sustainment work
//! is costed but receives no dates. Matching is tolerant of accents and
//! casing, so "Sustentação" and "sustentacao" classify the same way.

use serde::{Deserialize, Serialize};

use crate::models::Task;

/// Phase/epic fragments that mark a task as sustainment.
pub const DEFAULT_SUSTAINMENT_KEYWORDS: [&str; 5] = [
    "sustentacao",
    "atendimento ao consumidor",
    "sac 4.0",
    "faturamento de gestao operacional",
    "faturamento e gestao operacional",
];

/// Tasks split into the two scheduling buckets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Calendar-scheduled work.
    pub implementation: Vec<Task>,
    /// Costed work that receives no dates.
    pub sustainment: Vec<Task>,
}

/// Keyword classifier over normalized phase/epic text.
#[derive(Debug, Clone)]
pub struct Classifier {
    keywords: Vec<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_SUSTAINMENT_KEYWORDS.iter().map(|k| (*k).to_string()))
    }
}

impl Classifier {
    /// Creates a classifier from a keyword list. Keywords are normalized
    /// the same way task text is, so accented configuration values match.
    pub fn new(keywords: impl IntoIterator<Item = String>) -> Self {
        Self {
            keywords: keywords.into_iter().map(|k| normalize(&k)).collect(),
        }
    }

    /// Whether a task is sustainment work.
    pub fn is_sustainment(&self, task: &Task) -> bool {
        let phase = normalize(&task.phase);
        let epic = normalize(&task.epic);
        self.keywords
            .iter()
            .any(|k| phase.contains(k.as_str()) || epic.contains(k.as_str()))
    }

    /// Splits tasks into implementation and sustainment, preserving order.
    pub fn separate(&self, tasks: Vec<Task>) -> Classification {
        let mut classification = Classification::default();
        for task in tasks {
            if self.is_sustainment(&task) {
                classification.sustainment.push(task);
            } else {
                classification.implementation.push(task);
            }
        }
        classification
    }
}

/// Lowercases and folds Latin diacritics for keyword matching.
pub(crate) fn normalize(text: &str) -> String {
    text.to_lowercase().chars().map(fold_diacritic).collect()
}

fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        _ => c,
    }
}
