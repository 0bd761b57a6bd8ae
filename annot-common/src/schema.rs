//! Schema walker
//!
//! Enumerates the scoreable fields of a task and evaluates completeness
//! against the current scores. Nothing is cached: callers re-evaluate after
//! every store mutation.

use crate::scores::{profile_key, TaskScores, DIALOGUES_OVERALL_KEY, MEMORY_SCORE_KEY};
use crate::task::{Task, PROFILES_KEY};
use std::fmt;

/// Address of one score in the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldKey {
    pub field: String,
    pub sub_field: Option<String>,
}

impl FieldKey {
    pub fn top_level(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            sub_field: None,
        }
    }

    pub fn scoped(field: impl Into<String>, sub_field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            sub_field: Some(sub_field.into()),
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sub_field {
            Some(sub) => write!(f, "{}.{}", self.field, sub),
            None => f.write_str(&self.field),
        }
    }
}

/// Every score the task requires, in evaluation order:
/// transcript, memory, profile attributes, then the remaining fields.
///
/// The `profiles` key never needs a field-level score, whatever its shape.
pub fn scoreable_fields(task: &Task) -> Vec<FieldKey> {
    let mut keys = Vec::new();

    if task.dialogues.is_some() {
        keys.push(FieldKey::top_level(DIALOGUES_OVERALL_KEY));
    }
    if task.memory.is_some() {
        keys.push(FieldKey::top_level(MEMORY_SCORE_KEY));
    }
    if let Some(profiles) = task.profiles() {
        for (i, profile) in profiles.iter().enumerate() {
            let group = profile_key(i);
            keys.extend(
                profile
                    .attributes
                    .iter()
                    .map(|(attr, _)| FieldKey::scoped(group.clone(), attr.clone())),
            );
        }
    }
    keys.extend(
        task.fields
            .iter()
            .filter(|field| field.name != PROFILES_KEY)
            .map(|field| FieldKey::top_level(field.name.clone())),
    );

    keys
}

/// Required scores that are still unset
pub fn missing_fields(task: &Task, scores: &TaskScores) -> Vec<FieldKey> {
    scoreable_fields(task)
        .into_iter()
        .filter(|key| !scores.is_scored(&key.field, key.sub_field.as_deref()))
        .collect()
}

/// Whether every required score of `task` is set
///
/// A task without scoreable fields is trivially complete.
pub fn is_complete(task: &Task, scores: &TaskScores) -> bool {
    scoreable_fields(task)
        .iter()
        .all(|key| scores.is_scored(&key.field, key.sub_field.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scores::{Score, ScoreStore};
    use serde_json::json;

    fn sample_task() -> Task {
        Task::from_fixture_entry(&json!({"data": {
            "dialogues": ["A: bonjour", "B: salut"],
            "memory": "Deux amis se saluent.",
            "profiles": [
                {"Name": "Amélie", "Age": "20s", "Gender": "F"},
                {"Name": "Bruno", "Occupation": "baker"}
            ],
            "Formality": "informal",
            "Relationships": [{"Amélie": "friendOf", "Bruno": "friendOf"}]
        }}))
    }

    fn set(store: &mut ScoreStore, field: &str, sub: Option<&str>, v: &str) {
        store.set_score(0, field, sub, Score::parse(v));
    }

    #[test]
    fn test_enumeration_order() {
        let keys: Vec<String> = scoreable_fields(&sample_task())
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            keys,
            [
                "dialogues_overall",
                "memory",
                "profiles_0.Age",
                "profiles_0.Gender",
                "profiles_1.Occupation",
                "Formality",
                "Relationships",
            ]
        );
    }

    #[test]
    fn test_profile_name_never_required() {
        let keys = scoreable_fields(&sample_task());
        assert!(keys.iter().all(|k| k.sub_field.as_deref() != Some("Name")));
    }

    #[test]
    fn test_complete_only_when_every_field_scored() {
        let task = sample_task();
        let mut store = ScoreStore::new();

        set(&mut store, "dialogues_overall", None, "1");
        set(&mut store, "memory", None, "2");
        set(&mut store, "Formality", None, "0");
        set(&mut store, "Relationships", None, "1");
        set(&mut store, "profiles_0", Some("Age"), "2");
        set(&mut store, "profiles_0", Some("Gender"), "1");
        assert!(!is_complete(&task, store.task(0)));
        assert_eq!(
            missing_fields(&task, store.task(0)),
            vec![FieldKey::scoped("profiles_1", "Occupation")]
        );

        set(&mut store, "profiles_1", Some("Occupation"), "0");
        assert!(is_complete(&task, store.task(0)));

        // resetting to the placeholder makes it incomplete again
        set(&mut store, "profiles_0", Some("Age"), "");
        assert!(!is_complete(&task, store.task(0)));
    }

    #[test]
    fn test_aggregates_required_only_when_present() {
        let task = Task::from_fixture_entry(&json!({"data": {"Formality": "formal"}}));
        let mut store = ScoreStore::new();
        assert!(!is_complete(&task, store.task(0)));

        set(&mut store, "Formality", None, "1");
        assert!(is_complete(&task, store.task(0)));
    }

    #[test]
    fn test_task_without_fields_is_complete() {
        let task = Task::from_fixture_entry(&json!({"data": {}}));
        assert!(is_complete(&task, ScoreStore::new().task(0)));
    }

    #[test]
    fn test_non_array_profiles_never_required() {
        let task = Task::from_fixture_entry(&json!({"data": {"profiles": {"Name": "X", "Age": "3"}}}));
        assert!(scoreable_fields(&task).is_empty());
        assert!(is_complete(&task, ScoreStore::new().task(0)));
    }

    #[test]
    fn test_empty_dialogue_string_not_required() {
        let task = Task::from_fixture_entry(&json!({"data": {"dialogues": ""}}));
        assert!(scoreable_fields(&task).is_empty());
        assert!(is_complete(&task, ScoreStore::new().task(0)));
    }

    #[test]
    fn test_empty_dialogue_array_still_requires_score() {
        let task = Task::from_fixture_entry(&json!({"data": {"dialogues": []}}));
        assert_eq!(scoreable_fields(&task), vec![FieldKey::top_level("dialogues_overall")]);
    }
}
