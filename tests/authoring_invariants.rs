//! Store invariants exercised through the public API.

use classore_admin::authoring::{
    ChapterStore, CorrectFlag, QuestionType, QuizStore, QuizStoreError, MAX_OPTIONS,
};

fn chapter_sequences(store: &ChapterStore) -> Vec<u32> {
    store.chapters().iter().map(|c| c.sequence).collect()
}

#[test]
fn chapter_sequences_stay_contiguous_under_any_interleaving() {
    let mut store = ChapterStore::new();
    // A scripted mix of adds and removes, checking the invariant after
    // every single step.
    let script: &[(&str, u32)] = &[
        ("add", 0),
        ("add", 0),
        ("add", 0),
        ("remove", 2),
        ("add", 0),
        ("remove", 1),
        ("remove", 1),
        ("add", 0),
        ("add", 0),
        ("remove", 3),
        ("remove", 1),
    ];
    for (action, arg) in script {
        match *action {
            "add" => {
                store.add_chapter();
            }
            "remove" => store.remove_chapter(*arg),
            _ => unreachable!(),
        }
        let expected: Vec<u32> = (1..=store.chapters().len() as u32).collect();
        assert_eq!(chapter_sequences(&store), expected);
    }
}

#[test]
fn removing_chapter_k_cascades_over_lessons() {
    let mut store = ChapterStore::new();
    for _ in 0..3 {
        store.add_chapter();
    }
    store.add_lesson(1);
    store.add_lesson(2);
    store.add_lesson(2);
    store.add_lesson(3);

    store.remove_chapter(2);

    assert!(store.lessons().iter().all(|l| l.chapter_sequence != 3));
    assert_eq!(store.lessons_in_chapter(1).len(), 1);
    // Chapter 3's lesson was renumbered to chapter 2.
    assert_eq!(store.lessons_in_chapter(2).len(), 1);
    assert_eq!(store.lessons().len(), 2);
}

#[test]
fn one_chapter_plus_two_adds_then_remove_middle() {
    let mut store = ChapterStore::new();
    store.add_chapter();
    store.add_chapter();
    store.add_chapter();
    store.add_lesson(3);
    assert_eq!(chapter_sequences(&store), vec![1, 2, 3]);

    store.remove_chapter(2);
    assert_eq!(chapter_sequences(&store), vec![1, 2]);
    assert_eq!(store.lessons()[0].chapter_sequence, 2);
}

#[test]
fn yes_or_no_swap_always_yields_the_fixed_pair() {
    let mut store = QuizStore::new();
    store.add_question("ch", "mod", QuestionType::Multichoice);
    for _ in 0..3 {
        store.add_option("ch", "mod", 0).unwrap();
    }
    store.set_correct_option("ch", "mod", 0, 3).unwrap();

    store.set_question_type("ch", "mod", 0, QuestionType::YesOrNo).unwrap();

    let options = &store.questions("ch", "mod")[0].options;
    assert_eq!(options.len(), 2);
    assert_eq!(options[0].content, "True");
    assert_eq!(options[0].is_correct, CorrectFlag::Yes);
    assert_eq!(options[1].content, "False");
    assert_eq!(options[1].is_correct, CorrectFlag::No);
}

#[test]
fn option_bounds_leave_the_list_unchanged() {
    let mut store = QuizStore::new();
    store.add_question("ch", "mod", QuestionType::Multichoice);
    while store.questions("ch", "mod")[0].options.len() < MAX_OPTIONS {
        store.add_option("ch", "mod", 0).unwrap();
    }

    assert_eq!(store.add_option("ch", "mod", 0), Err(QuizStoreError::TooManyOptions));
    assert_eq!(store.questions("ch", "mod")[0].options.len(), MAX_OPTIONS);

    let mut store = QuizStore::new();
    store.add_question("ch", "mod", QuestionType::Multichoice);
    assert_eq!(
        store.remove_option("ch", "mod", 0, 0),
        Err(QuizStoreError::TooFewOptions)
    );
    assert_eq!(store.questions("ch", "mod")[0].options.len(), 1);
}
