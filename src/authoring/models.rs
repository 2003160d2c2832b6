//! Client-side DTOs for the course and quiz builders
//!
//! These mirror the payload shapes the Classore admin API accepts. Everything
//! starts out local-only (empty `id`) and acquires server identity after a
//! successful create call.

use serde::{Deserialize, Serialize};

/// Maximum options a multichoice question may carry.
pub const MAX_OPTIONS: usize = 4;
/// Minimum options any option-bearing question must keep.
pub const MIN_OPTIONS: usize = 1;
/// Maximum images attachable to one question.
pub const MAX_QUESTION_IMAGES: usize = 4;
/// Per-image size ceiling in bytes (5 MiB).
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;
/// Maximum question content length in characters.
pub const MAX_QUESTION_CONTENT_LEN: usize = 2000;

/// Top-level content grouping within a subject/course.
///
/// `sequence` is the 1-based position within the course and stays contiguous
/// after every store mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    /// Server id; empty until the chapter has been persisted.
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub content: String,
    pub sequence: u32,
    #[serde(default)]
    pub is_published: bool,
}

impl Chapter {
    pub fn new(sequence: u32) -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            content: String::new(),
            sequence,
            is_published: false,
        }
    }

    /// Whether this chapter has been persisted server-side.
    pub fn is_saved(&self) -> bool {
        !self.id.is_empty()
    }
}

/// A unit of content within a chapter (text, video, attachments).
///
/// Belongs to a chapter by `chapter_sequence`; local-only until
/// `lesson_chapter` (the server-side module id) is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    #[serde(default)]
    pub id: String,
    pub chapter_sequence: u32,
    /// Server-side chapter-module id, empty until persisted.
    #[serde(default)]
    pub lesson_chapter: String,
    pub title: String,
    pub content: String,
    pub sequence: u32,
    #[serde(default)]
    pub videos: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub tutor: String,
    #[serde(default)]
    pub is_published: bool,
}

impl Lesson {
    pub fn new(chapter_sequence: u32, sequence: u32) -> Self {
        Self {
            id: String::new(),
            chapter_sequence,
            lesson_chapter: String::new(),
            title: String::new(),
            content: String::new(),
            sequence,
            videos: Vec::new(),
            images: Vec::new(),
            attachments: Vec::new(),
            tutor: String::new(),
            is_published: false,
        }
    }

    pub fn is_saved(&self) -> bool {
        !self.lesson_chapter.is_empty()
    }
}

/// Question kinds the admin API understands. The last three are only valid
/// inside test-center sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    #[serde(rename = "MULTICHOICE")]
    Multichoice,
    #[serde(rename = "FILL_IN_THE_GAP")]
    FillInTheGap,
    #[serde(rename = "YES_OR_NO")]
    YesOrNo,
    #[serde(rename = "SPEAKING")]
    Speaking,
    #[serde(rename = "LISTENING")]
    Listening,
    #[serde(rename = "VISUAL")]
    Visual,
}

impl QuestionType {
    /// Single-answer types keep exactly one correct option; the test-center
    /// types toggle corrects independently.
    pub fn is_single_answer(self) -> bool {
        matches!(
            self,
            QuestionType::Multichoice | QuestionType::FillInTheGap | QuestionType::YesOrNo
        )
    }

    /// Whether this type carries an option list at all.
    pub fn has_options(self) -> bool {
        matches!(
            self,
            QuestionType::Multichoice | QuestionType::FillInTheGap | QuestionType::YesOrNo
        )
    }
}

/// Wire encoding of the correct-answer flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrectFlag {
    #[serde(rename = "YES")]
    Yes,
    #[serde(rename = "NO")]
    No,
}

impl CorrectFlag {
    pub fn is_yes(self) -> bool {
        matches!(self, CorrectFlag::Yes)
    }
}

/// One answer option of a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub content: String,
    pub is_correct: CorrectFlag,
    pub sequence_number: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl QuestionOption {
    pub fn blank(sequence_number: u32) -> Self {
        Self {
            content: String::new(),
            is_correct: CorrectFlag::No,
            sequence_number,
            images: Vec::new(),
        }
    }
}

/// An attached question image, tracked with its size so the store can enforce
/// the per-file ceiling before anything touches the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionImage {
    pub name: String,
    pub size_bytes: u64,
}

/// A quiz question belonging to one chapter module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub content: String,
    #[serde(default)]
    pub images: Vec<QuestionImage>,
    pub options: Vec<QuestionOption>,
    pub question_type: QuestionType,
    pub sequence: u32,
    pub sequence_number: u32,
}

impl Question {
    pub fn new(question_type: QuestionType, sequence: u32) -> Self {
        Self {
            id: None,
            content: String::new(),
            images: Vec::new(),
            options: option_template(question_type),
            question_type,
            sequence,
            sequence_number: sequence,
        }
    }
}

/// The type-specific option template applied whenever a question's type
/// changes. The previous option list is discarded wholesale.
pub fn option_template(question_type: QuestionType) -> Vec<QuestionOption> {
    match question_type {
        QuestionType::Multichoice => vec![QuestionOption::blank(1)],
        QuestionType::YesOrNo => vec![
            QuestionOption {
                content: "True".to_string(),
                is_correct: CorrectFlag::Yes,
                sequence_number: 1,
                images: Vec::new(),
            },
            QuestionOption {
                content: "False".to_string(),
                is_correct: CorrectFlag::No,
                sequence_number: 2,
                images: Vec::new(),
            },
        ],
        QuestionType::FillInTheGap => vec![QuestionOption {
            content: String::new(),
            is_correct: CorrectFlag::Yes,
            sequence_number: 1,
            images: Vec::new(),
        }],
        QuestionType::Speaking | QuestionType::Listening | QuestionType::Visual => Vec::new(),
    }
}
