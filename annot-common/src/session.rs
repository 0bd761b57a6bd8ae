//! Session controller
//!
//! Owns the selected language, the current task index and the score store.
//! Every annotator event is one synchronous method call; the completeness
//! check that gates `next` always reads the store as it is at that moment.
//!
//! States:
//! - `NoLanguageSelected` (initial): language picker
//! - `Browsing { language, index }`: task browser
//! - `NoTasksForLanguage { language }`: empty-language notice
//!
//! `change_language` leads from the browser back to the picker; the
//! following selection resets the store.

use crate::fixtures::FixtureSet;
use crate::schema::{self, FieldKey};
use crate::scores::{Score, ScoreStore, TaskScores};
use crate::task::Task;
use crate::{Error, Result};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    NoLanguageSelected,
    Browsing { language: String, index: usize },
    NoTasksForLanguage { language: String },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::NoLanguageSelected => "no_language_selected",
            SessionState::Browsing { .. } => "browsing",
            SessionState::NoTasksForLanguage { .. } => "no_tasks_for_language",
        }
    }
}

/// Read-only view of the task under annotation
#[derive(Debug, Clone, Copy)]
pub struct CurrentTask<'a> {
    pub language: &'a str,
    pub index: usize,
    pub total: usize,
    pub task: &'a Task,
    pub scores: &'a TaskScores,
}

impl CurrentTask<'_> {
    pub fn is_complete(&self) -> bool {
        schema::is_complete(self.task, self.scores)
    }

    pub fn missing_fields(&self) -> Vec<FieldKey> {
        schema::missing_fields(self.task, self.scores)
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.total
    }

    /// Forward navigation is allowed only on a complete, non-final task
    pub fn can_go_next(&self) -> bool {
        !self.is_last() && self.is_complete()
    }
}

/// Serialized score store ready for download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub filename: String,
    pub body: String,
}

/// One annotator's session
#[derive(Debug)]
pub struct Session {
    fixtures: FixtureSet,
    state: SessionState,
    scores: ScoreStore,
}

impl Session {
    pub fn new(fixtures: FixtureSet) -> Self {
        Self {
            fixtures,
            state: SessionState::NoLanguageSelected,
            scores: ScoreStore::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn fixtures(&self) -> &FixtureSet {
        &self.fixtures
    }

    pub fn scores(&self) -> &ScoreStore {
        &self.scores
    }

    /// Pick a language from the picker
    ///
    /// Always discards previously collected scores. Routes to the
    /// empty-language notice when the language has no tasks.
    pub fn select_language(&mut self, language: &str) -> Result<()> {
        if self.state != SessionState::NoLanguageSelected {
            return Err(self.refused("select_language"));
        }

        self.scores.clear();
        let language = language.to_string();
        let total = self.fixtures.tasks(&language).len();
        if total == 0 {
            info!("No tasks for language {}", language);
            self.state = SessionState::NoTasksForLanguage { language };
        } else {
            info!("Selected language {} ({} task(s))", language, total);
            self.state = SessionState::Browsing { language, index: 0 };
        }
        Ok(())
    }

    /// Leave the empty-language notice
    pub fn go_back(&mut self) -> Result<()> {
        match self.state {
            SessionState::NoTasksForLanguage { .. } => {
                debug!("Returning to language picker");
                self.state = SessionState::NoLanguageSelected;
                Ok(())
            }
            _ => Err(self.refused("go_back")),
        }
    }

    /// Return from the task browser to the language picker
    ///
    /// Scores are kept until the next language selection discards them.
    pub fn change_language(&mut self) -> Result<()> {
        match self.state {
            SessionState::Browsing { .. } => {
                debug!("Returning to language picker from task browser");
                self.state = SessionState::NoLanguageSelected;
                Ok(())
            }
            _ => Err(self.refused("change_language")),
        }
    }

    /// Move to the previous task; a no-op at index 0
    ///
    /// Returns whether the index changed.
    pub fn previous(&mut self) -> Result<bool> {
        let SessionState::Browsing { index, .. } = &mut self.state else {
            return Err(self.refused("previous"));
        };

        let moved = *index > 0;
        *index = index.saturating_sub(1);
        debug!("previous -> task {}", *index);
        Ok(moved)
    }

    /// Move to the next task; a no-op unless the current task is complete
    /// and not the last one
    ///
    /// Returns whether the index changed.
    pub fn next(&mut self) -> Result<bool> {
        let allowed = match self.current() {
            Some(current) => current.can_go_next(),
            None => return Err(self.refused("next")),
        };

        if let SessionState::Browsing { index, .. } = &mut self.state {
            if allowed {
                *index += 1;
                debug!("next -> task {}", *index);
            } else {
                debug!("next refused at task {} (incomplete or last)", *index);
            }
        }
        Ok(allowed)
    }

    /// Record a score for the current task
    ///
    /// The value is stored as given; no range check is applied here.
    pub fn set_score(&mut self, field: &str, sub_field: Option<&str>, score: Score) -> Result<()> {
        let SessionState::Browsing { index, .. } = &self.state else {
            return Err(self.refused("set_score"));
        };

        debug!(task = *index, field, sub_field, value = score.as_str(), "score updated");
        self.scores.set_score(*index, field, sub_field, score);
        Ok(())
    }

    /// The task under annotation, with its index clamped to the task list
    pub fn current(&self) -> Option<CurrentTask<'_>> {
        let SessionState::Browsing { language, index } = &self.state else {
            return None;
        };

        let tasks = self.fixtures.tasks(language);
        let index = (*index).min(tasks.len().checked_sub(1)?);
        Some(CurrentTask {
            language: language.as_str(),
            index,
            total: tasks.len(),
            task: &tasks[index],
            scores: self.scores.task(index),
        })
    }

    /// Serialize the whole score store as `scores-<language>.json`
    pub fn export(&self) -> Result<Export> {
        let SessionState::Browsing { language, .. } = &self.state else {
            return Err(self.refused("export"));
        };

        let export = Export {
            filename: format!("scores-{language}.json"),
            body: self.scores.to_json_pretty()?,
        };
        info!("Exported scores for {} as {}", language, export.filename);
        Ok(export)
    }

    fn refused(&self, operation: &str) -> Error {
        Error::InvalidTransition(format!("{} not allowed in state {}", operation, self.state.name()))
    }
}
