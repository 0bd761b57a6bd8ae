//! End-to-end session tests over fixture files on disk

use annot_common::config::{LanguageFixture, TomlConfig};
use annot_common::{FixtureSet, Score, Session, SessionState};
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const FRENCH_TASKS: &str = r#"[
  {"data": {
    "dialogues": ["Amélie: Bonjour Bruno !", "Bruno: Salut, ça va ?"],
    "profiles": [{"Name": "Amélie", "Age": "vingtaine"}]
  }},
  {"data": {
    "memory": "Amélie et Bruno se connaissent depuis l'école.",
    "Relationships": [{"Amélie": "friendOf", "Bruno": "friendOf"}]
  }}
]"#;

fn config_with_fixtures(dir: &TempDir) -> TomlConfig {
    fs::write(dir.path().join("task_fr.json"), FRENCH_TASKS).unwrap();
    fs::write(dir.path().join("task_bn.json"), "[]").unwrap();

    TomlConfig {
        fixtures_dir: dir.path().to_path_buf(),
        languages: vec![
            LanguageFixture {
                name: "French".into(),
                file: PathBuf::from("task_fr.json"),
            },
            LanguageFixture {
                name: "Hindi".into(),
                file: PathBuf::from("task_hi.json"),
            },
            LanguageFixture {
                name: "Bengali".into(),
                file: PathBuf::from("task_bn.json"),
            },
        ],
        ..TomlConfig::default()
    }
}

#[test]
fn test_fixture_set_loads_configured_languages() {
    let dir = TempDir::new().unwrap();
    let fixtures = FixtureSet::load(&config_with_fixtures(&dir)).unwrap();

    assert_eq!(fixtures.languages().collect::<Vec<_>>(), ["French", "Hindi", "Bengali"]);
    assert_eq!(fixtures.tasks("French").len(), 2);
    // missing file behaves like an empty fixture
    assert!(fixtures.tasks("Hindi").is_empty());
    assert!(fixtures.tasks("Bengali").is_empty());
}

#[test]
fn test_malformed_fixture_file_is_startup_error() {
    let dir = TempDir::new().unwrap();
    let config = config_with_fixtures(&dir);
    fs::write(dir.path().join("task_fr.json"), "{ not json").unwrap();

    let err = FixtureSet::load(&config).unwrap_err();
    assert!(err.to_string().contains("task_fr.json"), "{err}");
}

#[test]
fn test_annotate_and_export_french_session() {
    let dir = TempDir::new().unwrap();
    let fixtures = FixtureSet::load(&config_with_fixtures(&dir)).unwrap();
    let mut session = Session::new(fixtures);

    session.select_language("French").unwrap();
    session.set_score("dialogues_overall", None, Score::parse("1")).unwrap();
    assert!(!session.next().unwrap(), "profile attribute still unscored");

    session.set_score("profiles_0", Some("Age"), Score::parse("2")).unwrap();
    assert!(session.current().unwrap().is_complete());

    let export = session.export().unwrap();
    assert_eq!(export.filename, "scores-French.json");
    let document: Value = serde_json::from_str(&export.body).unwrap();
    assert_eq!(
        document,
        json!({"0": {"dialogues_overall": "1", "profiles_0": {"Age": "2"}}})
    );

    assert!(session.next().unwrap());
    let current = session.current().unwrap();
    assert_eq!((current.index, current.total), (1, 2));
    let missing: Vec<String> = current.missing_fields().iter().map(ToString::to_string).collect();
    assert_eq!(missing, ["memory", "Relationships"]);
}

#[test]
fn test_empty_language_round_trip_to_picker() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::new(FixtureSet::load(&config_with_fixtures(&dir)).unwrap());

    session.select_language("Hindi").unwrap();
    assert_eq!(
        session.state(),
        &SessionState::NoTasksForLanguage {
            language: "Hindi".into()
        }
    );
    session.go_back().unwrap();
    session.select_language("French").unwrap();
    assert!(matches!(session.state(), SessionState::Browsing { index: 0, .. }));
}
