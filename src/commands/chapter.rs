//! Chapter/lesson draft handlers
//!
//! Drafts are edited locally as JSON, loaded through the [`ChapterStore`] so
//! the sequencing invariants apply, then pushed to the backend in order:
//! chapters first, then their lessons, each lesson carrying the server id of
//! its chapter. The store is mutated optimistically with the returned server
//! ids and rolled back wholesale if any request fails.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use log::{info, warn};
use serde::Deserialize;
use serde_json::{json, Value};

use super::resource::authenticated_client;
use crate::api::{endpoints::resources, Operation};
use crate::authoring::ChapterStore;
use crate::config::Config;

#[derive(Debug, Deserialize)]
pub struct CourseDraft {
    pub subject_id: String,
    pub chapters: Vec<ChapterDraft>,
}

#[derive(Debug, Deserialize)]
pub struct ChapterDraft {
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub lessons: Vec<LessonDraft>,
}

#[derive(Debug, Deserialize)]
pub struct LessonDraft {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tutor: String,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub videos: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Read a draft file and replay it through the store, which assigns the
/// contiguous chapter and lesson sequences.
pub fn load_draft(path: &Path) -> Result<(CourseDraft, ChapterStore)> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read draft {}", path.display()))?;
    let draft: CourseDraft = serde_json::from_str(&raw)
        .with_context(|| format!("Draft {} is not valid JSON", path.display()))?;

    let mut store = ChapterStore::new();
    for chapter in &draft.chapters {
        let sequence = store.add_chapter().sequence;
        store.set_chapter_name(sequence, &chapter.name);
        store.set_chapter_content(sequence, &chapter.content);
        for lesson in &chapter.lessons {
            let lesson_sequence = store
                .add_lesson(sequence)
                .map(|l| l.sequence)
                .context("Lesson added to a chapter that does not exist")?;
            store.set_lesson_title(sequence, lesson_sequence, &lesson.title);
            store.set_lesson_content(sequence, lesson_sequence, &lesson.content);
            store.set_lesson_tutor(sequence, lesson_sequence, &lesson.tutor);
            for attachment in &lesson.attachments {
                store.add_lesson_attachment(sequence, lesson_sequence, attachment);
            }
            for video in &lesson.videos {
                store.add_lesson_video(sequence, lesson_sequence, video);
            }
            for image in &lesson.images {
                store.add_lesson_image(sequence, lesson_sequence, image);
            }
        }
    }
    Ok((draft, store))
}

pub fn show_command(path: &Path) -> Result<()> {
    let (draft, store) = load_draft(path)?;

    println!("subject: {}", draft.subject_id);
    for chapter in store.chapters() {
        println!("{}. {}", chapter.sequence, chapter.name.bold());
        for lesson in store.lessons_in_chapter(chapter.sequence) {
            println!("   {}.{} {}", chapter.sequence, lesson.sequence, lesson.title);
        }
    }
    Ok(())
}

pub async fn push_command(config: &Config, path: &Path) -> Result<()> {
    let (draft, mut store) = load_draft(path)?;
    let client = authenticated_client(config).await?;

    let snapshot = store.snapshot();
    match push_store(&client, &draft.subject_id, &mut store).await {
        Ok(()) => {
            println!("{}", "Draft pushed.".green());
            for lesson in store.lessons() {
                println!("lesson '{}' -> module {}", lesson.title, lesson.lesson_chapter);
            }
            Ok(())
        }
        Err(error) => {
            // Roll back the optimistic server-id bookkeeping; records created
            // before the failure still exist remotely and will upsert on the
            // next push.
            store.restore(snapshot);
            warn!("Draft push failed, local draft state rolled back: {error:#}");
            Err(error)
        }
    }
}

async fn push_store(
    client: &crate::api::ClassoreClient,
    subject_id: &str,
    store: &mut ChapterStore,
) -> Result<()> {
    let chapter_sequences: Vec<u32> = store.chapters().iter().map(|c| c.sequence).collect();

    for sequence in chapter_sequences {
        let chapter = store
            .chapters()
            .iter()
            .find(|c| c.sequence == sequence)
            .cloned()
            .context("chapter disappeared from store")?;

        let result = Operation::create(
            resources::CHAPTERS,
            json!({
                "subject": subject_id,
                "name": &chapter.name,
                "content": &chapter.content,
                "sequence": chapter.sequence,
            }),
        )
        .execute(client)
        .await?;
        let chapter_id = extract_id(&result.data)
            .with_context(|| format!("Server returned no id for chapter '{}'", chapter.name))?;
        store.mark_chapter_saved(sequence, &chapter_id);
        info!("Created chapter '{}' as {}", chapter.name, chapter_id);

        let lesson_sequences: Vec<u32> = store
            .lessons_in_chapter(sequence)
            .iter()
            .map(|l| l.sequence)
            .collect();
        for lesson_sequence in lesson_sequences {
            let lesson = store
                .lessons_in_chapter(sequence)
                .into_iter()
                .find(|l| l.sequence == lesson_sequence)
                .cloned()
                .context("lesson disappeared from store")?;

            let result = Operation::create(
                resources::CHAPTER_MODULES,
                json!({
                    "chapter": &chapter_id,
                    "title": &lesson.title,
                    "content": &lesson.content,
                    "sequence": lesson.sequence,
                    "tutor": &lesson.tutor,
                    "attachments": &lesson.attachments,
                    "videos": &lesson.videos,
                    "images": &lesson.images,
                }),
            )
            .execute(client)
            .await?;
            let module_id = extract_id(&result.data)
                .with_context(|| format!("Server returned no id for lesson '{}'", lesson.title))?;
            store.mark_lesson_saved(sequence, lesson_sequence, &module_id);
            info!("Created lesson '{}' as module {}", lesson.title, module_id);
        }
    }
    Ok(())
}

fn extract_id(data: &Option<Value>) -> Option<String> {
    data.as_ref()
        .and_then(|d| d.get("id"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_loads_through_store_with_sequences() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.json");
        std::fs::write(
            &path,
            r#"{
                "subject_id": "subj-1",
                "chapters": [
                    {"name": "Algebra", "lessons": [{"title": "Linear equations"}, {"title": "Quadratics"}]},
                    {"name": "Geometry", "lessons": [{"title": "Angles"}]}
                ]
            }"#,
        )
        .unwrap();

        let (draft, store) = load_draft(&path).unwrap();
        assert_eq!(draft.subject_id, "subj-1");
        let sequences: Vec<u32> = store.chapters().iter().map(|c| c.sequence).collect();
        assert_eq!(sequences, vec![1, 2]);
        assert_eq!(store.lessons_in_chapter(1).len(), 2);
        assert_eq!(store.lessons_in_chapter(2)[0].sequence, 1);
    }

    #[test]
    fn invalid_draft_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.json");
        std::fs::write(&path, "{").unwrap();
        assert!(load_draft(&path).is_err());
    }
}
