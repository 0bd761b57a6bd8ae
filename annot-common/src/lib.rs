//! # Annotator Common Library
//!
//! Shared core for the annotation service:
//! - Score range lookup table
//! - Task record normalization and fixture loading
//! - Score store and completeness evaluation
//! - Session controller (language, task index, export)
//! - Bootstrap configuration loading

pub mod config;
pub mod error;
pub mod fixtures;
pub mod range;
pub mod schema;
pub mod scores;
pub mod session;
pub mod task;

pub use error::{Error, Result};
pub use fixtures::FixtureSet;
pub use scores::{Score, ScoreStore};
pub use session::{Session, SessionState};
pub use task::{FieldValue, Task};
