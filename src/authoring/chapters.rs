//! In-progress chapter/lesson tree for the course builder
//!
//! The store owns the not-yet-submitted state and is the single place the
//! sequencing invariants are enforced: after every mutation, chapter
//! sequences form the contiguous range `[1..N]` and lesson sequences are
//! contiguous within their chapter.

use super::models::{Chapter, Lesson};

/// Owned state container for the course builder.
///
/// All mutations are synchronous over owned state, so command handlers can
/// snapshot before an optimistic server call and restore on failure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChapterStore {
    chapters: Vec<Chapter>,
    lessons: Vec<Lesson>,
}

impl ChapterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    /// Lessons belonging to the chapter at `chapter_sequence`, in order.
    pub fn lessons_in_chapter(&self, chapter_sequence: u32) -> Vec<&Lesson> {
        self.lessons
            .iter()
            .filter(|l| l.chapter_sequence == chapter_sequence)
            .collect()
    }

    /// Append a new empty chapter at the end.
    pub fn add_chapter(&mut self) -> &Chapter {
        let sequence = self.chapters.len() as u32 + 1;
        self.chapters.push(Chapter::new(sequence));
        self.chapters.last().unwrap()
    }

    /// Remove the chapter at `sequence`, cascading over its lessons.
    ///
    /// Later chapters shift down by one, lessons of the removed chapter are
    /// dropped, and lessons of later chapters have their `chapter_sequence`
    /// decremented so the foreign keys keep pointing at the same chapters.
    pub fn remove_chapter(&mut self, sequence: u32) {
        let before = self.chapters.len();
        self.chapters.retain(|c| c.sequence != sequence);
        if self.chapters.len() == before {
            return;
        }
        for chapter in &mut self.chapters {
            if chapter.sequence > sequence {
                chapter.sequence -= 1;
            }
        }
        self.lessons.retain(|l| l.chapter_sequence != sequence);
        for lesson in &mut self.lessons {
            if lesson.chapter_sequence > sequence {
                lesson.chapter_sequence -= 1;
            }
        }
    }

    pub fn set_chapter_name(&mut self, sequence: u32, name: impl Into<String>) {
        if let Some(chapter) = self.chapter_mut(sequence) {
            chapter.name = name.into();
        }
    }

    pub fn set_chapter_content(&mut self, sequence: u32, content: impl Into<String>) {
        if let Some(chapter) = self.chapter_mut(sequence) {
            chapter.content = content.into();
        }
    }

    /// Record the server id a chapter received once persisted.
    pub fn mark_chapter_saved(&mut self, sequence: u32, id: impl Into<String>) {
        if let Some(chapter) = self.chapter_mut(sequence) {
            chapter.id = id.into();
        }
    }

    /// Append a new empty lesson to the chapter at `chapter_sequence`.
    pub fn add_lesson(&mut self, chapter_sequence: u32) -> Option<&Lesson> {
        if !self.chapters.iter().any(|c| c.sequence == chapter_sequence) {
            return None;
        }
        let sequence = self
            .lessons
            .iter()
            .filter(|l| l.chapter_sequence == chapter_sequence)
            .count() as u32
            + 1;
        self.lessons.push(Lesson::new(chapter_sequence, sequence));
        self.lessons.last()
    }

    /// Remove one lesson, resequencing only within the same chapter.
    pub fn remove_lesson(&mut self, chapter_sequence: u32, sequence: u32) {
        let before = self.lessons.len();
        self.lessons
            .retain(|l| !(l.chapter_sequence == chapter_sequence && l.sequence == sequence));
        if self.lessons.len() == before {
            return;
        }
        for lesson in &mut self.lessons {
            if lesson.chapter_sequence == chapter_sequence && lesson.sequence > sequence {
                lesson.sequence -= 1;
            }
        }
    }

    pub fn set_lesson_title(&mut self, chapter_sequence: u32, sequence: u32, title: impl Into<String>) {
        if let Some(lesson) = self.lesson_mut(chapter_sequence, sequence) {
            lesson.title = title.into();
        }
    }

    pub fn set_lesson_content(&mut self, chapter_sequence: u32, sequence: u32, content: impl Into<String>) {
        if let Some(lesson) = self.lesson_mut(chapter_sequence, sequence) {
            lesson.content = content.into();
        }
    }

    pub fn set_lesson_tutor(&mut self, chapter_sequence: u32, sequence: u32, tutor: impl Into<String>) {
        if let Some(lesson) = self.lesson_mut(chapter_sequence, sequence) {
            lesson.tutor = tutor.into();
        }
    }

    pub fn add_lesson_attachment(&mut self, chapter_sequence: u32, sequence: u32, attachment: impl Into<String>) {
        if let Some(lesson) = self.lesson_mut(chapter_sequence, sequence) {
            lesson.attachments.push(attachment.into());
        }
    }

    pub fn add_lesson_video(&mut self, chapter_sequence: u32, sequence: u32, video: impl Into<String>) {
        if let Some(lesson) = self.lesson_mut(chapter_sequence, sequence) {
            lesson.videos.push(video.into());
        }
    }

    pub fn add_lesson_image(&mut self, chapter_sequence: u32, sequence: u32, image: impl Into<String>) {
        if let Some(lesson) = self.lesson_mut(chapter_sequence, sequence) {
            lesson.images.push(image.into());
        }
    }

    /// Record the server module id a lesson received once persisted.
    pub fn mark_lesson_saved(&mut self, chapter_sequence: u32, sequence: u32, module_id: impl Into<String>) {
        if let Some(lesson) = self.lesson_mut(chapter_sequence, sequence) {
            lesson.lesson_chapter = module_id.into();
        }
    }

    /// Clone the current state for optimistic-update rollback.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    /// Revert to a previously taken snapshot.
    pub fn restore(&mut self, snapshot: Self) {
        *self = snapshot;
    }

    fn chapter_mut(&mut self, sequence: u32) -> Option<&mut Chapter> {
        self.chapters.iter_mut().find(|c| c.sequence == sequence)
    }

    fn lesson_mut(&mut self, chapter_sequence: u32, sequence: u32) -> Option<&mut Lesson> {
        self.lessons
            .iter_mut()
            .find(|l| l.chapter_sequence == chapter_sequence && l.sequence == sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequences(store: &ChapterStore) -> Vec<u32> {
        store.chapters().iter().map(|c| c.sequence).collect()
    }

    #[test]
    fn add_chapter_appends_contiguous_sequences() {
        let mut store = ChapterStore::new();
        store.add_chapter();
        store.add_chapter();
        store.add_chapter();
        assert_eq!(sequences(&store), vec![1, 2, 3]);
    }

    #[test]
    fn remove_chapter_resequences() {
        let mut store = ChapterStore::new();
        for _ in 0..4 {
            store.add_chapter();
        }
        store.remove_chapter(2);
        assert_eq!(sequences(&store), vec![1, 2, 3]);
        store.remove_chapter(1);
        assert_eq!(sequences(&store), vec![1, 2]);
    }

    #[test]
    fn remove_missing_chapter_is_noop() {
        let mut store = ChapterStore::new();
        store.add_chapter();
        store.remove_chapter(5);
        assert_eq!(sequences(&store), vec![1]);
    }

    #[test]
    fn remove_chapter_cascades_over_lessons() {
        let mut store = ChapterStore::new();
        for _ in 0..3 {
            store.add_chapter();
        }
        store.add_lesson(2);
        store.add_lesson(2);
        store.add_lesson(3);

        store.remove_chapter(2);

        // Lessons of chapter 2 are gone, chapter 3's lesson now points at 2.
        assert_eq!(store.lessons().len(), 1);
        assert_eq!(store.lessons()[0].chapter_sequence, 2);
    }

    #[test]
    fn remove_lesson_resequences_within_chapter_only() {
        let mut store = ChapterStore::new();
        store.add_chapter();
        store.add_chapter();
        store.add_lesson(1);
        store.add_lesson(1);
        store.add_lesson(1);
        store.add_lesson(2);

        store.remove_lesson(1, 2);

        let in_one: Vec<u32> = store.lessons_in_chapter(1).iter().map(|l| l.sequence).collect();
        assert_eq!(in_one, vec![1, 2]);
        let in_two: Vec<u32> = store.lessons_in_chapter(2).iter().map(|l| l.sequence).collect();
        assert_eq!(in_two, vec![1]);
    }

    #[test]
    fn add_lesson_requires_existing_chapter() {
        let mut store = ChapterStore::new();
        assert!(store.add_lesson(1).is_none());
        store.add_chapter();
        assert!(store.add_lesson(1).is_some());
    }

    #[test]
    fn snapshot_restore_roundtrip() {
        let mut store = ChapterStore::new();
        store.add_chapter();
        store.set_chapter_name(1, "Algebra");
        let snapshot = store.snapshot();

        store.remove_chapter(1);
        assert!(store.chapters().is_empty());

        store.restore(snapshot);
        assert_eq!(store.chapters()[0].name, "Algebra");
    }

    #[test]
    fn removing_the_middle_chapter_renumbers_later_lessons() {
        let mut store = ChapterStore::new();
        store.add_chapter();
        store.add_lesson(1);
        store.add_chapter();
        store.add_chapter();
        store.add_lesson(3);
        assert_eq!(sequences(&store), vec![1, 2, 3]);

        store.remove_chapter(2);
        assert_eq!(sequences(&store), vec![1, 2]);
        let renumbered: Vec<u32> = store.lessons().iter().map(|l| l.chapter_sequence).collect();
        assert_eq!(renumbered, vec![1, 2]);
    }
}
