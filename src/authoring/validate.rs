//! Question validation
//!
//! One rule set for both advisory display and the submit path. The CLI
//! prints the returned strings verbatim; submission refuses to run while any
//! question reports a violation.

use super::models::{
    Question, QuestionType, MAX_OPTIONS, MAX_QUESTION_CONTENT_LEN, MIN_OPTIONS,
};

/// Collect every human-readable rule violation for one question.
///
/// An empty vector means the question is submittable.
pub fn question_errors(question: &Question) -> Vec<String> {
    let mut errors = Vec::new();

    if question.content.trim().is_empty() {
        errors.push(format!("question {}: content is empty", question.sequence));
    }
    if question.content.chars().count() > MAX_QUESTION_CONTENT_LEN {
        errors.push(format!(
            "question {}: content exceeds {} characters",
            question.sequence, MAX_QUESTION_CONTENT_LEN
        ));
    }

    if question.question_type.has_options() {
        if question.options.len() < MIN_OPTIONS {
            errors.push(format!(
                "question {}: needs at least {} option",
                question.sequence, MIN_OPTIONS
            ));
        }
        if question.options.len() > MAX_OPTIONS {
            errors.push(format!(
                "question {}: has more than {} options",
                question.sequence, MAX_OPTIONS
            ));
        }
        if !question.options.iter().any(|o| o.is_correct.is_yes()) {
            errors.push(format!(
                "question {}: no option is marked correct",
                question.sequence
            ));
        }
        let blank_options = question
            .options
            .iter()
            .filter(|o| o.content.trim().is_empty())
            .count();
        // Fill-in-the-gap answers may legitimately be short, but never blank.
        if blank_options > 0 {
            errors.push(format!(
                "question {}: {} option(s) have no content",
                question.sequence, blank_options
            ));
        }
    }

    if question.question_type == QuestionType::FillInTheGap && !question.content.contains("___") {
        errors.push(format!(
            "question {}: fill-in-the-gap content has no `___` gap marker",
            question.sequence
        ));
    }

    errors
}

/// Validate a whole question list; returns every violation across the list.
pub fn questions_errors(questions: &[Question]) -> Vec<String> {
    questions.iter().flat_map(question_errors).collect()
}
