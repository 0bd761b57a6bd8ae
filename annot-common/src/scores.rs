//! Score store
//!
//! Holds, per task index, the score chosen for each field. Profile
//! attributes are stored one level deeper, under `profiles_<i>`.
//!
//! The store accepts any value it is handed. Range enforcement is the
//! presentation layer's job, and exported data must round-trip even if it
//! holds values outside today's ranges.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Store key for the whole-transcript score
pub const DIALOGUES_OVERALL_KEY: &str = "dialogues_overall";

/// Store key for the memory summary score
pub const MEMORY_SCORE_KEY: &str = "memory";

/// Store key grouping the attribute scores of profile `index`
pub fn profile_key(index: usize) -> String {
    format!("profiles_{index}")
}

/// One score selection
///
/// `Unset` covers both "never touched" and "reset to the placeholder".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Score {
    #[default]
    Unset,
    Selected(String),
}

impl Score {
    /// Parse a submitted form value; empty means unset
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            Score::Unset
        } else {
            Score::Selected(raw.to_string())
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Score::Selected(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Score::Unset => "",
            Score::Selected(value) => value,
        }
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Score::parse(&raw))
    }
}

/// Value stored under one field key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreSlot {
    Value(Score),
    Nested(IndexMap<String, Score>),
}

impl ScoreSlot {
    /// A nested slot counts as scored, matching how the field-level check
    /// only asks whether anything non-empty is stored.
    pub fn is_set(&self) -> bool {
        match self {
            ScoreSlot::Value(score) => score.is_set(),
            ScoreSlot::Nested(_) => true,
        }
    }
}

/// Scores of a single task, keyed by field in first-scored order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskScores {
    fields: IndexMap<String, ScoreSlot>,
}

impl TaskScores {
    pub fn set(&mut self, field: &str, sub_field: Option<&str>, score: Score) {
        match sub_field {
            None => {
                self.fields.insert(field.to_string(), ScoreSlot::Value(score));
            }
            Some(sub_field) => {
                let slot = self
                    .fields
                    .entry(field.to_string())
                    .or_insert_with(|| ScoreSlot::Nested(IndexMap::new()));
                if matches!(slot, ScoreSlot::Value(_)) {
                    *slot = ScoreSlot::Nested(IndexMap::new());
                }
                if let ScoreSlot::Nested(map) = slot {
                    map.insert(sub_field.to_string(), score);
                }
            }
        }
    }

    /// Score stored for `field` / `sub_field`, `Unset` when absent
    pub fn get(&self, field: &str, sub_field: Option<&str>) -> &Score {
        const UNSET: &Score = &Score::Unset;

        match (self.fields.get(field), sub_field) {
            (Some(ScoreSlot::Value(score)), None) => score,
            (Some(ScoreSlot::Nested(map)), Some(sub)) => map.get(sub).unwrap_or(UNSET),
            _ => UNSET,
        }
    }

    /// Whether `field` / `sub_field` holds a non-empty score
    pub fn is_scored(&self, field: &str, sub_field: Option<&str>) -> bool {
        match sub_field {
            None => self.fields.get(field).is_some_and(ScoreSlot::is_set),
            Some(_) => self.get(field, sub_field).is_set(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// All scores collected in a session, keyed by task index
///
/// Tasks never touched are absent rather than present and empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreStore {
    tasks: BTreeMap<usize, TaskScores>,
}

impl ScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite one score; sibling sub-field scores are preserved
    pub fn set_score(&mut self, task_index: usize, field: &str, sub_field: Option<&str>, score: Score) {
        self.tasks
            .entry(task_index)
            .or_default()
            .set(field, sub_field, score);
    }

    /// Scores of one task; an untouched task reads as empty
    pub fn task(&self, task_index: usize) -> &TaskScores {
        static EMPTY: std::sync::OnceLock<TaskScores> = std::sync::OnceLock::new();
        self.tasks
            .get(&task_index)
            .unwrap_or_else(|| EMPTY.get_or_init(TaskScores::default))
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Pretty-printed JSON document of every scored task
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
