//! Quiz draft handlers
//!
//! One validation path: both `validate` and `submit` run the questions
//! through `authoring::question_errors`, and submission refuses to touch the
//! network while any violation remains.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use log::info;
use serde::Deserialize;
use serde_json::json;

use super::resource::authenticated_client;
use crate::api::{endpoints::resources, Operations};
use crate::authoring::{questions_errors, Question, QuizStore};
use crate::config::Config;

#[derive(Debug, Deserialize)]
pub struct QuizDraft {
    pub chapter_id: String,
    pub module_id: String,
    pub questions: Vec<Question>,
}

/// Read a draft file into the store, which resequences the questions.
pub fn load_draft(path: &Path) -> Result<(QuizDraft, QuizStore)> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read draft {}", path.display()))?;
    let draft: QuizDraft = serde_json::from_str(&raw)
        .with_context(|| format!("Draft {} is not valid JSON", path.display()))?;

    let mut store = QuizStore::new();
    for question in draft.questions.clone() {
        store.insert_question(&draft.chapter_id, &draft.module_id, question);
    }
    Ok((draft, store))
}

pub fn validate_command(path: &Path) -> Result<()> {
    let (draft, store) = load_draft(path)?;
    let questions = store.questions(&draft.chapter_id, &draft.module_id);
    let errors = questions_errors(questions);

    if errors.is_empty() {
        println!(
            "{} {} question(s) ready for module {}",
            "OK:".green(),
            questions.len(),
            draft.module_id
        );
        Ok(())
    } else {
        for error in &errors {
            println!("{} {error}", "error:".red());
        }
        anyhow::bail!("{} validation error(s)", errors.len());
    }
}

pub async fn submit_command(config: &Config, path: &Path) -> Result<()> {
    let (draft, store) = load_draft(path)?;
    let questions = store.questions(&draft.chapter_id, &draft.module_id);

    let errors = questions_errors(questions);
    if !errors.is_empty() {
        for error in &errors {
            println!("{} {error}", "error:".red());
        }
        anyhow::bail!("Draft has {} validation error(s); nothing was submitted", errors.len());
    }

    let client = authenticated_client(config).await?;
    // Sequential on purpose: question order is meaningful server-side.
    let mut batch = Operations::new();
    for question in questions {
        let payload = json!({
            "module": &draft.module_id,
            "content": &question.content,
            "question_type": question.question_type,
            "sequence": question.sequence,
            "sequence_number": question.sequence_number,
            "options": &question.options,
            "images": &question.images,
        });
        batch = batch.create(resources::QUESTIONS, payload);
    }
    let results = batch
        .execute(&client)
        .await
        .context("Question submission stopped at the first failure")?;
    info!("Submitted {} question(s) to module {}", results.len(), draft.module_id);

    println!(
        "{} {} question(s) submitted to module {}",
        "Done.".green(),
        results.len(),
        draft.module_id
    );
    Ok(())
}
