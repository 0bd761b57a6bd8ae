//! Static task fixtures
//!
//! One ordered task list per language, loaded once at startup. A language
//! whose file is missing gets an empty list; the session routes it to the
//! "no tasks" notice rather than failing.

use crate::config::TomlConfig;
use crate::task::Task;
use crate::{Error, Result};
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

/// Tasks of one language
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageTasks {
    pub name: String,
    pub tasks: Vec<Task>,
}

/// Every configured language with its tasks, in picker order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixtureSet {
    languages: Vec<LanguageTasks>,
}

impl FixtureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every language listed in `config`
    pub fn load(config: &TomlConfig) -> Result<Self> {
        let mut set = Self::new();
        for language in &config.languages {
            let path = config.fixture_path(language);
            let tasks = load_file(&path)?;
            info!("Loaded {} task(s) for {} from {}", tasks.len(), language.name, path.display());
            set.insert(&language.name, tasks);
        }
        Ok(set)
    }

    /// Add or replace the tasks of `language`
    pub fn insert(&mut self, language: &str, tasks: Vec<Task>) {
        match self.languages.iter_mut().find(|l| l.name == language) {
            Some(existing) => existing.tasks = tasks,
            None => self.languages.push(LanguageTasks {
                name: language.to_string(),
                tasks,
            }),
        }
    }

    /// Builder-style [`FixtureSet::insert`] from fixture JSON text
    pub fn with_json(mut self, language: &str, json: &str) -> Result<Self> {
        let tasks = parse_tasks(json)?;
        self.insert(language, tasks);
        Ok(self)
    }

    /// Language names in picker order
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.iter().map(|l| l.name.as_str())
    }

    /// Tasks of `language`; unknown languages have none
    pub fn tasks(&self, language: &str) -> &[Task] {
        self.languages
            .iter()
            .find(|l| l.name == language)
            .map(|l| l.tasks.as_slice())
            .unwrap_or(&[])
    }
}

/// Parse a fixture document: a JSON array of `{"data": <task>}` entries
pub fn parse_tasks(json: &str) -> Result<Vec<Task>> {
    let document: Value = serde_json::from_str(json)?;
    match document {
        Value::Array(entries) => Ok(entries.iter().map(Task::from_fixture_entry).collect()),
        other => Err(Error::Config(format!(
            "fixture must be a JSON array, found {}",
            json_kind(&other)
        ))),
    }
}

fn load_file(path: &Path) -> Result<Vec<Task>> {
    if !path.exists() {
        warn!("Fixture file {} not found, language has no tasks", path.display());
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)?;
    parse_tasks(&content).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
