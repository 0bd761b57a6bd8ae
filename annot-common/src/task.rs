//! Task records
//!
//! A task is normalized once, when its fixture is loaded, into a closed set
//! of field shapes. Rendering and completeness code match on [`FieldValue`]
//! instead of re-inspecting raw JSON.

use serde_json::{Map, Value};

/// Reserved key holding the dialogue transcript
pub const DIALOGUES_KEY: &str = "dialogues";
/// Reserved key holding the memory summary
pub const MEMORY_KEY: &str = "memory";
/// Reserved key holding the profile collection
pub const PROFILES_KEY: &str = "profiles";
/// Field rendered as subject/predicate/object triples
pub const RELATIONSHIPS_KEY: &str = "Relationships";
/// Display-only profile attribute
pub const PROFILE_NAME_KEY: &str = "Name";

/// One `key: value` line of an object block
pub type Entry = (String, String);

/// One annotation task
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Task {
    /// Transcript lines, scored once as a whole
    pub dialogues: Option<Vec<String>>,
    /// Memory summary
    pub memory: Option<String>,
    /// Every other top-level field, in fixture order
    pub fields: Vec<Field>,
}

/// A named top-level field
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: FieldValue,
}

/// Shape of a field value, assigned at load time
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// String, number, bool or null
    Scalar(String),
    /// Array of scalars
    List(Vec<String>),
    /// Array containing objects
    ObjectList(Vec<ListItem>),
    /// Single object
    Nested(Vec<Entry>),
    /// The `Relationships` array
    RelationPairs(Vec<Relation>),
    /// The `profiles` array
    ProfileList(Vec<Profile>),
}

/// Element of an [`FieldValue::ObjectList`]
#[derive(Debug, Clone, PartialEq)]
pub enum ListItem {
    Block(Vec<Entry>),
    Line(String),
}

/// Element of a [`FieldValue::RelationPairs`]
#[derive(Debug, Clone, PartialEq)]
pub enum Relation {
    /// Two-entry object: `{subject: predicate, object: inverse}`
    Triple {
        subject: String,
        predicate: String,
        object: String,
        inverse: String,
    },
    /// Object with any other number of entries
    Pairs(Vec<Entry>),
    Line(String),
}

/// A named entity whose attributes (other than its name) are scored
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub name: Option<String>,
    /// Scoreable attributes in fixture order, `Name` excluded
    pub attributes: Vec<Entry>,
}

impl Task {
    /// Normalize a raw task record
    ///
    /// Never fails: shapes that are not specifically recognized degrade to
    /// the generic variants.
    pub fn from_record(record: &Map<String, Value>) -> Self {
        let mut task = Task::default();

        for (key, value) in record {
            match key.as_str() {
                DIALOGUES_KEY => task.dialogues = dialogue_lines(value),
                MEMORY_KEY => {
                    let text = display_text(value);
                    task.memory = (!text.is_empty()).then_some(text);
                }
                _ => task.fields.push(Field {
                    name: key.clone(),
                    value: FieldValue::classify(key, value),
                }),
            }
        }

        task
    }

    /// Normalize a fixture entry (`{"data": {...}}` or a bare record)
    pub fn from_fixture_entry(entry: &Value) -> Self {
        let record = entry
            .get("data")
            .and_then(Value::as_object)
            .or_else(|| entry.as_object());

        match record {
            Some(record) => Self::from_record(record),
            None => Task::default(),
        }
    }

    /// Profiles of this task, if it carries a profile collection
    pub fn profiles(&self) -> Option<&[Profile]> {
        self.fields.iter().find_map(|field| match &field.value {
            FieldValue::ProfileList(profiles) => Some(profiles.as_slice()),
            _ => None,
        })
    }
}

impl FieldValue {
    /// Assign the shape of `value` stored under `key`
    pub fn classify(key: &str, value: &Value) -> Self {
        match value {
            Value::Array(items) if key == PROFILES_KEY => {
                FieldValue::ProfileList(items.iter().map(Profile::from_value).collect())
            }
            Value::Array(items) if key == RELATIONSHIPS_KEY => {
                FieldValue::RelationPairs(items.iter().map(Relation::from_value).collect())
            }
            Value::Array(items) if items.iter().all(|item| !item.is_object()) => {
                FieldValue::List(items.iter().map(display_text).collect())
            }
            Value::Array(items) => FieldValue::ObjectList(
                items
                    .iter()
                    .map(|item| match item {
                        Value::Object(map) => ListItem::Block(entries(map)),
                        other => ListItem::Line(display_text(other)),
                    })
                    .collect(),
            ),
            Value::Object(map) => FieldValue::Nested(entries(map)),
            other => FieldValue::Scalar(display_text(other)),
        }
    }
}

impl Relation {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) if map.len() == 2 => {
                let mut pairs = map.iter();
                match (pairs.next(), pairs.next()) {
                    (Some((subject, predicate)), Some((object, inverse))) => Relation::Triple {
                        subject: subject.clone(),
                        predicate: display_text(predicate),
                        object: object.clone(),
                        inverse: display_text(inverse),
                    },
                    _ => Relation::Pairs(entries(map)),
                }
            }
            Value::Object(map) => Relation::Pairs(entries(map)),
            other => Relation::Line(display_text(other)),
        }
    }
}

impl Profile {
    fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Profile::default();
        };

        Profile {
            name: map.get(PROFILE_NAME_KEY).map(display_text),
            attributes: map
                .iter()
                .filter(|(key, _)| key.as_str() != PROFILE_NAME_KEY)
                .map(|(key, value)| (key.clone(), display_text(value)))
                .collect(),
        }
    }
}

/// Falsy scalars (`null`, `""`, `false`, `0`) mean no transcript; an empty
/// array is still a transcript.
fn dialogue_lines(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Array(lines) => Some(lines.iter().map(display_text).collect()),
        other => Some(vec![display_text(other)]),
    }
}

fn entries(map: &Map<String, Value>) -> Vec<Entry> {
    map.iter()
        .map(|(key, value)| (key.clone(), display_text(value)))
        .collect()
}

/// Text shown for a value nested inside a field
pub fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(display_text)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}
