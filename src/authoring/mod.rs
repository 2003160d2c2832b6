//! Local authoring state for the course and quiz builders
//!
//! Explicit state containers, passed by reference to whatever needs them.
//! The stores own the sequencing invariants (contiguous 1-based sequences
//! after every mutation, cascading removal) so no caller has to maintain
//! them by convention.

pub mod chapters;
pub mod models;
pub mod quiz;
pub mod validate;

pub use chapters::ChapterStore;
pub use models::{
    Chapter, CorrectFlag, Lesson, Question, QuestionImage, QuestionOption, QuestionType,
    MAX_IMAGE_BYTES, MAX_OPTIONS, MAX_QUESTION_CONTENT_LEN, MAX_QUESTION_IMAGES, MIN_OPTIONS,
};
pub use quiz::{MoveDirection, QuizStore, QuizStoreError};
pub use validate::{question_errors, questions_errors};
