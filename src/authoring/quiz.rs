//! Per-(chapter, module) question/option trees prior to submission
//!
//! Two-level mapping keyed by chapter id then module id, each resolving to an
//! ordered question list. Bounds violations come back as typed errors so the
//! CLI can render them without the store knowing anything about output.

use std::collections::{HashMap, HashSet};

use super::models::{
    option_template, CorrectFlag, Question, QuestionImage, QuestionOption, QuestionType,
    MAX_IMAGE_BYTES, MAX_OPTIONS, MAX_QUESTION_IMAGES, MIN_OPTIONS,
};

/// Bounds and lookup failures raised by [`QuizStore`] mutations.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum QuizStoreError {
    #[error("a question can have at most {MAX_OPTIONS} options")]
    TooManyOptions,
    #[error("a question must keep at least {MIN_OPTIONS} option")]
    TooFewOptions,
    #[error("a question can have at most {MAX_QUESTION_IMAGES} images")]
    TooManyImages,
    #[error("image '{name}' exceeds the {MAX_IMAGE_BYTES} byte limit")]
    ImageTooLarge { name: String },
    #[error("no question at index {0}")]
    NoSuchQuestion(usize),
    #[error("no option at index {0}")]
    NoSuchOption(usize),
    #[error("question type {0:?} does not carry options")]
    TypeWithoutOptions(QuestionType),
}

/// Direction for adjacent question reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Owned quiz-builder state for every (chapter, module) pair being edited.
#[derive(Debug, Clone, Default)]
pub struct QuizStore {
    questions: HashMap<String, HashMap<String, Vec<Question>>>,
    /// Indices of questions marked in the multi-select UI, per module.
    selected: HashMap<String, HashMap<String, HashSet<usize>>>,
}

impl QuizStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Questions for one module, empty slice if none were added yet.
    pub fn questions(&self, chapter_id: &str, module_id: &str) -> &[Question] {
        self.questions
            .get(chapter_id)
            .and_then(|modules| modules.get(module_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Append a new question of `question_type` and return its index.
    pub fn add_question(
        &mut self,
        chapter_id: &str,
        module_id: &str,
        question_type: QuestionType,
    ) -> usize {
        let list = self.list_mut(chapter_id, module_id);
        let sequence = list.len() as u32 + 1;
        list.push(Question::new(question_type, sequence));
        list.len() - 1
    }

    /// Insert an already-built question (e.g. from a draft file) at the end
    /// and resequence, so draft order wins over whatever sequences the file
    /// claimed.
    pub fn insert_question(&mut self, chapter_id: &str, module_id: &str, question: Question) {
        let list = self.list_mut(chapter_id, module_id);
        list.push(question);
        Self::resequence(list);
    }

    /// Remove the question at `index` and resequence the remainder.
    pub fn remove_question(
        &mut self,
        chapter_id: &str,
        module_id: &str,
        index: usize,
    ) -> Result<(), QuizStoreError> {
        let list = self.list_mut(chapter_id, module_id);
        if index >= list.len() {
            return Err(QuizStoreError::NoSuchQuestion(index));
        }
        list.remove(index);
        Self::resequence(list);
        self.clear_selection(chapter_id, module_id);
        Ok(())
    }

    /// Deep-copy the question at `index`, append the copy at the end and
    /// resequence. The copy loses any server identity.
    pub fn duplicate_question(
        &mut self,
        chapter_id: &str,
        module_id: &str,
        index: usize,
    ) -> Result<usize, QuizStoreError> {
        let list = self.list_mut(chapter_id, module_id);
        let mut copy = list
            .get(index)
            .cloned()
            .ok_or(QuizStoreError::NoSuchQuestion(index))?;
        copy.id = None;
        list.push(copy);
        Self::resequence(list);
        Ok(list.len() - 1)
    }

    /// Swap the question at `index` with its neighbour. No-op at the
    /// boundaries.
    pub fn reorder_question(
        &mut self,
        chapter_id: &str,
        module_id: &str,
        index: usize,
        direction: MoveDirection,
    ) -> Result<(), QuizStoreError> {
        let list = self.list_mut(chapter_id, module_id);
        if index >= list.len() {
            return Err(QuizStoreError::NoSuchQuestion(index));
        }
        match direction {
            MoveDirection::Up if index > 0 => list.swap(index, index - 1),
            MoveDirection::Down if index + 1 < list.len() => list.swap(index, index + 1),
            _ => return Ok(()),
        }
        Self::resequence(list);
        Ok(())
    }

    pub fn set_question_content(
        &mut self,
        chapter_id: &str,
        module_id: &str,
        index: usize,
        content: impl Into<String>,
    ) -> Result<(), QuizStoreError> {
        let question = self.question_mut(chapter_id, module_id, index)?;
        question.content = content.into();
        Ok(())
    }

    /// Change a question's type, replacing the whole option list with the
    /// type-specific template.
    pub fn set_question_type(
        &mut self,
        chapter_id: &str,
        module_id: &str,
        index: usize,
        question_type: QuestionType,
    ) -> Result<(), QuizStoreError> {
        let question = self.question_mut(chapter_id, module_id, index)?;
        question.question_type = question_type;
        question.options = option_template(question_type);
        Ok(())
    }

    /// Mark the option at `option_index` correct.
    ///
    /// Single-answer types clear every other correct flag; the test-center
    /// types toggle the flag independently.
    pub fn set_correct_option(
        &mut self,
        chapter_id: &str,
        module_id: &str,
        index: usize,
        option_index: usize,
    ) -> Result<(), QuizStoreError> {
        let question = self.question_mut(chapter_id, module_id, index)?;
        if option_index >= question.options.len() {
            return Err(QuizStoreError::NoSuchOption(option_index));
        }
        if question.question_type.is_single_answer() {
            for (i, option) in question.options.iter_mut().enumerate() {
                option.is_correct = if i == option_index {
                    CorrectFlag::Yes
                } else {
                    CorrectFlag::No
                };
            }
        } else {
            let option = &mut question.options[option_index];
            option.is_correct = match option.is_correct {
                CorrectFlag::Yes => CorrectFlag::No,
                CorrectFlag::No => CorrectFlag::Yes,
            };
        }
        Ok(())
    }

    /// Append a blank option, bounded by [`MAX_OPTIONS`].
    pub fn add_option(
        &mut self,
        chapter_id: &str,
        module_id: &str,
        index: usize,
    ) -> Result<(), QuizStoreError> {
        let question = self.question_mut(chapter_id, module_id, index)?;
        if !question.question_type.has_options() {
            return Err(QuizStoreError::TypeWithoutOptions(question.question_type));
        }
        if question.options.len() >= MAX_OPTIONS {
            return Err(QuizStoreError::TooManyOptions);
        }
        let sequence_number = question.options.len() as u32 + 1;
        question.options.push(QuestionOption::blank(sequence_number));
        Ok(())
    }

    /// Remove one option, bounded by [`MIN_OPTIONS`], resequencing the rest.
    pub fn remove_option(
        &mut self,
        chapter_id: &str,
        module_id: &str,
        index: usize,
        option_index: usize,
    ) -> Result<(), QuizStoreError> {
        let question = self.question_mut(chapter_id, module_id, index)?;
        if question.options.len() <= MIN_OPTIONS {
            return Err(QuizStoreError::TooFewOptions);
        }
        if option_index >= question.options.len() {
            return Err(QuizStoreError::NoSuchOption(option_index));
        }
        question.options.remove(option_index);
        for (i, option) in question.options.iter_mut().enumerate() {
            option.sequence_number = i as u32 + 1;
        }
        Ok(())
    }

    pub fn set_option_content(
        &mut self,
        chapter_id: &str,
        module_id: &str,
        index: usize,
        option_index: usize,
        content: impl Into<String>,
    ) -> Result<(), QuizStoreError> {
        let question = self.question_mut(chapter_id, module_id, index)?;
        let option = question
            .options
            .get_mut(option_index)
            .ok_or(QuizStoreError::NoSuchOption(option_index))?;
        option.content = content.into();
        Ok(())
    }

    /// Attach images, enforcing the per-question count and per-file size
    /// ceilings per file. Every file that fits is kept; the rest come back
    /// as one error each, so the caller can report every rejection.
    pub fn add_images_to_question(
        &mut self,
        chapter_id: &str,
        module_id: &str,
        index: usize,
        images: Vec<QuestionImage>,
    ) -> Result<(), Vec<QuizStoreError>> {
        let question = self
            .question_mut(chapter_id, module_id, index)
            .map_err(|error| vec![error])?;
        let mut violations = Vec::new();
        for image in images {
            if image.size_bytes > MAX_IMAGE_BYTES {
                violations.push(QuizStoreError::ImageTooLarge { name: image.name });
            } else if question.images.len() >= MAX_QUESTION_IMAGES {
                violations.push(QuizStoreError::TooManyImages);
            } else {
                question.images.push(image);
            }
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    // Selection map for multi-select deletion.

    pub fn toggle_question_selection(&mut self, chapter_id: &str, module_id: &str, index: usize) {
        let set = self
            .selected
            .entry(chapter_id.to_string())
            .or_default()
            .entry(module_id.to_string())
            .or_default();
        if !set.remove(&index) {
            set.insert(index);
        }
    }

    pub fn select_all_questions(&mut self, chapter_id: &str, module_id: &str) {
        let count = self.questions(chapter_id, module_id).len();
        let set = self
            .selected
            .entry(chapter_id.to_string())
            .or_default()
            .entry(module_id.to_string())
            .or_default();
        *set = (0..count).collect();
    }

    pub fn clear_selection(&mut self, chapter_id: &str, module_id: &str) {
        if let Some(modules) = self.selected.get_mut(chapter_id) {
            modules.remove(module_id);
        }
    }

    pub fn selected_questions(&self, chapter_id: &str, module_id: &str) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .selected
            .get(chapter_id)
            .and_then(|modules| modules.get(module_id))
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        indices.sort_unstable();
        indices
    }

    /// Remove every selected question in one pass, then resequence and clear
    /// the selection.
    pub fn delete_selected_questions(&mut self, chapter_id: &str, module_id: &str) {
        let selected: HashSet<usize> = self.selected_questions(chapter_id, module_id).into_iter().collect();
        if selected.is_empty() {
            return;
        }
        let list = self.list_mut(chapter_id, module_id);
        let mut index = 0usize;
        list.retain(|_| {
            let keep = !selected.contains(&index);
            index += 1;
            keep
        });
        Self::resequence(list);
        self.clear_selection(chapter_id, module_id);
    }

    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    pub fn restore(&mut self, snapshot: Self) {
        *self = snapshot;
    }

    fn list_mut(&mut self, chapter_id: &str, module_id: &str) -> &mut Vec<Question> {
        self.questions
            .entry(chapter_id.to_string())
            .or_default()
            .entry(module_id.to_string())
            .or_default()
    }

    fn question_mut(
        &mut self,
        chapter_id: &str,
        module_id: &str,
        index: usize,
    ) -> Result<&mut Question, QuizStoreError> {
        self.list_mut(chapter_id, module_id)
            .get_mut(index)
            .ok_or(QuizStoreError::NoSuchQuestion(index))
    }

    fn resequence(list: &mut [Question]) {
        for (i, question) in list.iter_mut().enumerate() {
            question.sequence = i as u32 + 1;
            question.sequence_number = i as u32 + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAPTER: &str = "chapter-1";
    const MODULE: &str = "module-1";

    fn store_with_questions(n: usize) -> QuizStore {
        let mut store = QuizStore::new();
        for _ in 0..n {
            store.add_question(CHAPTER, MODULE, QuestionType::Multichoice);
        }
        store
    }

    #[test]
    fn add_question_assigns_contiguous_sequences() {
        let store = store_with_questions(3);
        let sequences: Vec<u32> = store.questions(CHAPTER, MODULE).iter().map(|q| q.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
    }

    #[test]
    fn remove_question_resequences() {
        let mut store = store_with_questions(3);
        store.remove_question(CHAPTER, MODULE, 0).unwrap();
        let sequences: Vec<u32> = store.questions(CHAPTER, MODULE).iter().map(|q| q.sequence).collect();
        assert_eq!(sequences, vec![1, 2]);
    }

    #[test]
    fn duplicate_question_deep_copies_and_appends() {
        let mut store = store_with_questions(2);
        store.set_question_content(CHAPTER, MODULE, 0, "What is 2 + 2?").unwrap();
        let copy_index = store.duplicate_question(CHAPTER, MODULE, 0).unwrap();
        assert_eq!(copy_index, 2);

        let questions = store.questions(CHAPTER, MODULE);
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[2].content, "What is 2 + 2?");
        assert_eq!(questions[2].sequence, 3);
        assert!(questions[2].id.is_none());
    }

    #[test]
    fn reorder_question_swaps_adjacent_and_noops_at_boundary() {
        let mut store = store_with_questions(2);
        store.set_question_content(CHAPTER, MODULE, 0, "first").unwrap();
        store.set_question_content(CHAPTER, MODULE, 1, "second").unwrap();

        store.reorder_question(CHAPTER, MODULE, 0, MoveDirection::Up).unwrap();
        assert_eq!(store.questions(CHAPTER, MODULE)[0].content, "first");

        store.reorder_question(CHAPTER, MODULE, 0, MoveDirection::Down).unwrap();
        assert_eq!(store.questions(CHAPTER, MODULE)[0].content, "second");
        assert_eq!(store.questions(CHAPTER, MODULE)[0].sequence, 1);
    }

    #[test]
    fn type_change_replaces_options_with_template() {
        let mut store = store_with_questions(1);
        store.add_option(CHAPTER, MODULE, 0).unwrap();
        store.add_option(CHAPTER, MODULE, 0).unwrap();

        store.set_question_type(CHAPTER, MODULE, 0, QuestionType::YesOrNo).unwrap();
        let options = &store.questions(CHAPTER, MODULE)[0].options;
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].content, "True");
        assert_eq!(options[0].is_correct, CorrectFlag::Yes);
        assert_eq!(options[1].content, "False");
        assert_eq!(options[1].is_correct, CorrectFlag::No);
    }

    #[test]
    fn add_option_bounded_at_max() {
        let mut store = store_with_questions(1);
        for _ in 0..MAX_OPTIONS - 1 {
            store.add_option(CHAPTER, MODULE, 0).unwrap();
        }
        let err = store.add_option(CHAPTER, MODULE, 0).unwrap_err();
        assert_eq!(err, QuizStoreError::TooManyOptions);
        assert_eq!(store.questions(CHAPTER, MODULE)[0].options.len(), MAX_OPTIONS);
    }

    #[test]
    fn remove_option_bounded_at_min() {
        let mut store = store_with_questions(1);
        let err = store.remove_option(CHAPTER, MODULE, 0, 0).unwrap_err();
        assert_eq!(err, QuizStoreError::TooFewOptions);
        assert_eq!(store.questions(CHAPTER, MODULE)[0].options.len(), 1);
    }

    #[test]
    fn single_answer_correct_clears_others() {
        let mut store = store_with_questions(1);
        store.add_option(CHAPTER, MODULE, 0).unwrap();
        store.add_option(CHAPTER, MODULE, 0).unwrap();

        store.set_correct_option(CHAPTER, MODULE, 0, 1).unwrap();
        store.set_correct_option(CHAPTER, MODULE, 0, 2).unwrap();

        let corrects: Vec<bool> = store.questions(CHAPTER, MODULE)[0]
            .options
            .iter()
            .map(|o| o.is_correct.is_yes())
            .collect();
        assert_eq!(corrects, vec![false, false, true]);
    }

    #[test]
    fn multi_answer_correct_toggles_independently() {
        let mut store = QuizStore::new();
        store.add_question(CHAPTER, MODULE, QuestionType::Listening);
        // Options are not templated for test-center types; give it two.
        {
            let question = store.question_mut(CHAPTER, MODULE, 0).unwrap();
            question.options.push(QuestionOption::blank(1));
            question.options.push(QuestionOption::blank(2));
        }

        store.set_correct_option(CHAPTER, MODULE, 0, 0).unwrap();
        store.set_correct_option(CHAPTER, MODULE, 0, 1).unwrap();
        let corrects: Vec<bool> = store.questions(CHAPTER, MODULE)[0]
            .options
            .iter()
            .map(|o| o.is_correct.is_yes())
            .collect();
        assert_eq!(corrects, vec![true, true]);

        store.set_correct_option(CHAPTER, MODULE, 0, 0).unwrap();
        assert!(!store.questions(CHAPTER, MODULE)[0].options[0].is_correct.is_yes());
    }

    #[test]
    fn out_of_range_option_index_names_the_option() {
        let mut store = store_with_questions(1);
        assert_eq!(
            store.set_correct_option(CHAPTER, MODULE, 0, 9),
            Err(QuizStoreError::NoSuchOption(9))
        );
        assert_eq!(
            store.set_option_content(CHAPTER, MODULE, 0, 9, "x"),
            Err(QuizStoreError::NoSuchOption(9))
        );
        assert_eq!(
            store.set_correct_option(CHAPTER, MODULE, 9, 0),
            Err(QuizStoreError::NoSuchQuestion(9))
        );
    }

    #[test]
    fn image_bounds_enforced() {
        let mut store = store_with_questions(1);
        let small = |name: &str| QuestionImage { name: name.to_string(), size_bytes: 1024 };

        store
            .add_images_to_question(CHAPTER, MODULE, 0, (0..MAX_QUESTION_IMAGES).map(|i| small(&format!("{i}.png"))).collect())
            .unwrap();
        let errors = store
            .add_images_to_question(CHAPTER, MODULE, 0, vec![small("extra.png")])
            .unwrap_err();
        assert_eq!(errors, vec![QuizStoreError::TooManyImages]);

        let mut store = store_with_questions(1);
        let errors = store
            .add_images_to_question(
                CHAPTER,
                MODULE,
                0,
                vec![QuestionImage { name: "huge.png".to_string(), size_bytes: MAX_IMAGE_BYTES + 1 }],
            )
            .unwrap_err();
        assert!(matches!(errors[0], QuizStoreError::ImageTooLarge { .. }));
    }

    #[test]
    fn oversized_image_does_not_block_later_valid_files() {
        let mut store = store_with_questions(1);
        let errors = store
            .add_images_to_question(
                CHAPTER,
                MODULE,
                0,
                vec![
                    QuestionImage { name: "huge.png".to_string(), size_bytes: MAX_IMAGE_BYTES + 1 },
                    QuestionImage { name: "ok.png".to_string(), size_bytes: 1024 },
                ],
            )
            .unwrap_err();

        // The valid file is attached, the oversized one is reported.
        let names: Vec<&str> = store.questions(CHAPTER, MODULE)[0]
            .images
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, vec!["ok.png"]);
        assert_eq!(
            errors,
            vec![QuizStoreError::ImageTooLarge { name: "huge.png".to_string() }]
        );
    }

    #[test]
    fn selection_and_bulk_delete() {
        let mut store = store_with_questions(4);
        store.set_question_content(CHAPTER, MODULE, 1, "keep me").unwrap();
        store.toggle_question_selection(CHAPTER, MODULE, 0);
        store.toggle_question_selection(CHAPTER, MODULE, 2);
        store.toggle_question_selection(CHAPTER, MODULE, 3);
        store.toggle_question_selection(CHAPTER, MODULE, 3); // untoggle
        assert_eq!(store.selected_questions(CHAPTER, MODULE), vec![0, 2]);

        store.delete_selected_questions(CHAPTER, MODULE);
        let questions = store.questions(CHAPTER, MODULE);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].content, "keep me");
        assert_eq!(questions[0].sequence, 1);
        assert!(store.selected_questions(CHAPTER, MODULE).is_empty());
    }

    #[test]
    fn select_all_then_delete_empties_module() {
        let mut store = store_with_questions(3);
        store.select_all_questions(CHAPTER, MODULE);
        store.delete_selected_questions(CHAPTER, MODULE);
        assert!(store.questions(CHAPTER, MODULE).is_empty());
    }

    #[test]
    fn modules_are_isolated() {
        let mut store = QuizStore::new();
        store.add_question(CHAPTER, "module-a", QuestionType::Multichoice);
        store.add_question(CHAPTER, "module-b", QuestionType::YesOrNo);
        assert_eq!(store.questions(CHAPTER, "module-a").len(), 1);
        assert_eq!(store.questions(CHAPTER, "module-b").len(), 1);
        store.remove_question(CHAPTER, "module-a", 0).unwrap();
        assert_eq!(store.questions(CHAPTER, "module-b").len(), 1);
    }
}
