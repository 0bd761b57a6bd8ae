//! Server-side HTML rendering
//!
//! Turns the session into one of three screens: language picker,
//! empty-language notice, or task browser. Field values are matched on
//! their normalized shape; every scoreable field gets a score dropdown whose
//! options come from the range table.

use annot_common::range::resolve_range;
use annot_common::schema::FieldKey;
use annot_common::scores::{profile_key, Score, TaskScores, DIALOGUES_OVERALL_KEY, MEMORY_SCORE_KEY};
use annot_common::session::CurrentTask;
use annot_common::task::{Entry, Field, FieldValue, ListItem, Profile, Relation};
use annot_common::{Session, SessionState};
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use std::fmt::Write;

/// Render the screen for the session's current state
pub fn render_page(session: &Session) -> String {
    let (title, body) = match session.state() {
        SessionState::NoLanguageSelected => (
            "Select a language".to_string(),
            language_picker(session.fixtures().languages()),
        ),
        SessionState::NoTasksForLanguage { language } => {
            (format!("No tasks - {language}"), no_tasks_notice(language))
        }
        SessionState::Browsing { .. } => match session.current() {
            Some(current) => (
                format!("Task {} / {} - {}", current.index + 1, current.total, current.language),
                task_browser(&current),
            ),
            None => ("Annotator".to_string(), String::new()),
        },
    };

    layout(&title, &body)
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="/static/annotator.css">
</head>
<body>
{body}
</body>
</html>
"#,
        title = text(title),
    )
}

/// Language picker: one button per configured language
pub fn language_picker<'a>(languages: impl Iterator<Item = &'a str>) -> String {
    let mut html = String::from("<h2>Select a language</h2>\n");
    for language in languages {
        let _ = writeln!(
            html,
            r#"<form method="post" action="/language"><button class="language" type="submit" name="language" value="{}">{}</button></form>"#,
            attr(language),
            text(language),
        );
    }
    html
}

/// Notice shown when the chosen language has no tasks
pub fn no_tasks_notice(language: &str) -> String {
    format!(
        r#"<h2>No tasks found for language: {}</h2>
<form method="post" action="/back"><button type="submit">Go back</button></form>
"#,
        text(language)
    )
}

/// Task browser: header, transcript, memory, remaining fields, navigation
pub fn task_browser(current: &CurrentTask<'_>) -> String {
    let task = current.task;
    let scores = current.scores;
    let mut html = format!("<h2>Task {} / {}</h2>\n", current.index + 1, current.total);

    if let Some(lines) = &task.dialogues {
        let _ = write!(
            html,
            r#"<section class="dialogues">
<div class="section-header"><h3>Dialogues</h3>{}</div>
<div class="transcript">
"#,
            score_select(&FieldKey::top_level(DIALOGUES_OVERALL_KEY), scores)
        );
        for line in lines {
            let _ = writeln!(html, "<div>{}</div>", text(line));
        }
        html.push_str("</div>\n</section>\n");
    }

    if let Some(memory) = &task.memory {
        let _ = write!(
            html,
            r#"<section class="memory">
<div class="section-header"><h3>Memory</h3>{}</div>
<p>{}</p>
</section>
"#,
            score_select(&FieldKey::top_level(MEMORY_SCORE_KEY), scores),
            text(memory)
        );
    }

    for field in &task.fields {
        html.push_str(&render_field(field, scores));
    }

    html.push_str(&navigation(current));
    html
}

/// One top-level field with its score control(s)
pub fn render_field(field: &Field, scores: &TaskScores) -> String {
    match &field.value {
        FieldValue::ProfileList(profiles) => render_profiles(profiles, scores),
        value => format!(
            r#"<div class="field">
<strong>{}:</strong> {}
<div class="score">{}</div>
</div>
"#,
            text(&field.name),
            render_value(value),
            score_select(&FieldKey::top_level(field.name.as_str()), scores)
        ),
    }
}

/// Display form of a field value, without score controls
pub fn render_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Scalar(s) => text(s).into_owned(),
        FieldValue::List(items) => items
            .iter()
            .map(|item| format!("<div>{}</div>", text(item)))
            .collect(),
        FieldValue::ObjectList(items) => items
            .iter()
            .map(|item| match item {
                ListItem::Block(entries) => entry_block(entries),
                ListItem::Line(line) => format!("<div>{}</div>", text(line)),
            })
            .collect(),
        FieldValue::Nested(entries) => entry_block(entries),
        FieldValue::RelationPairs(relations) => relations.iter().map(render_relation).collect(),
        FieldValue::ProfileList(profiles) => profiles
            .iter()
            .map(|p| format!("{}{}", profile_heading(p), entry_block(&p.attributes)))
            .collect(),
    }
}

fn entry_block(entries: &[Entry]) -> String {
    let mut html = String::from(r#"<div class="block">"#);
    for (key, value) in entries {
        let _ = write!(html, "<div><strong>{}:</strong> {}</div>", text(key), text(value));
    }
    html.push_str("</div>");
    html
}

fn render_relation(relation: &Relation) -> String {
    match relation {
        Relation::Triple {
            subject,
            predicate,
            object,
            ..
        } => format!(
            r#"<div class="relation">{} <strong>{}</strong> {}</div>"#,
            text(subject),
            text(predicate),
            text(object)
        ),
        Relation::Pairs(entries) => {
            let lines: String = entries
                .iter()
                .map(|(k, v)| format!("<div>{} <strong>{}</strong></div>", text(k), text(v)))
                .collect();
            format!("<div>{lines}</div>")
        }
        Relation::Line(line) => format!("<div>{}</div>", text(line)),
    }
}

fn render_profiles(profiles: &[Profile], scores: &TaskScores) -> String {
    let mut html = String::from("<section class=\"profiles\">\n<h2>Profiles</h2>\n");
    for (i, profile) in profiles.iter().enumerate() {
        let group = profile_key(i);
        html.push_str("<div class=\"profile\">\n");
        let _ = writeln!(html, "{}", profile_heading(profile));
        for (attribute, value) in &profile.attributes {
            let key = FieldKey::scoped(group.as_str(), attribute.as_str());
            let _ = write!(
                html,
                r#"<div class="attribute"><strong>{}:</strong> {}
<div class="score">{}</div>
</div>
"#,
                text(attribute),
                text(value),
                score_select(&key, scores)
            );
        }
        html.push_str("</div>\n");
    }
    html.push_str("</section>\n");
    html
}

/// A profile's name, shown but never scored
fn profile_heading(profile: &Profile) -> String {
    format!("<h3>{}</h3>", text(profile.name.as_deref().unwrap_or_default()))
}

/// Score dropdown bound to one store key
///
/// Choosing an option posts it immediately; the empty placeholder clears
/// the score.
pub fn score_select(key: &FieldKey, scores: &TaskScores) -> String {
    let sub_field = key.sub_field.as_deref();
    let current: &Score = scores.get(&key.field, sub_field);

    let mut html = format!(
        r#"<form method="post" action="/score" class="score-form"><input type="hidden" name="field" value="{}">"#,
        attr(&key.field)
    );
    if let Some(sub) = sub_field {
        let _ = write!(html, r#"<input type="hidden" name="sub_field" value="{}">"#, attr(sub));
    }
    html.push_str(r#"<select name="value" onchange="this.form.submit()"><option value="">Select score</option>"#);
    for n in resolve_range(&key.field, sub_field) {
        let value = n.to_string();
        let selected = if current.as_str() == value { " selected" } else { "" };
        let _ = write!(html, r#"<option value="{value}"{selected}>{value}</option>"#);
    }
    html.push_str("</select><noscript><button type=\"submit\">Save</button></noscript></form>");
    html
}

fn navigation(current: &CurrentTask<'_>) -> String {
    let complete = current.is_complete();
    let missing = current.missing_fields().len();

    let mut html = String::new();
    if !complete {
        let _ = writeln!(
            html,
            r#"<p class="missing">{missing} score{} missing</p>"#,
            if missing == 1 { "" } else { "s" }
        );
    }

    let _ = write!(
        html,
        r#"<div class="navigation">
<form method="post" action="/previous"><button type="submit"{previous_disabled}>Previous</button></form>
<form method="post" action="/next"><button type="submit"{next_disabled}{next_class}>Next</button></form>
<a class="export" href="/export" download>Export Scores</a>
<form method="post" action="/change-language"><button type="submit">Change language</button></form>
</div>
"#,
        previous_disabled = if current.is_first() { " disabled" } else { "" },
        next_disabled = if current.can_go_next() { "" } else { " disabled" },
        next_class = if complete { "" } else { r#" class="incomplete""# },
    );
    html
}
