//! The scoring engine.
//!
//! Pure functions from (answers, catalog) to normalized scores and tendency
//! labels. No I/O, no clocks, no hidden state: identical inputs always
//! produce identical outputs, so the engine is safe to call concurrently
//! from any number of request handlers.
//!
//! The catalog's weights are authoritative throughout. Answers carry
//! denormalized weight copies for client convenience, but stale copies never
//! affect a score.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::catalog::QuestionCatalog;
use crate::descriptions::DescriptionTable;
use crate::error::AppError;
use crate::model::{Answer, CategoryScore, Choice, Question, Tendency};

/// Normalized score used when a question set has no score range at all
/// (empty category, or every question weighted identically on both sides).
const ZERO_RANGE_SCORE: u8 = 50;

/// Check the submission precondition: every answer references a catalog
/// question, no question is answered twice, and every catalog question is
/// answered exactly once.
///
/// The compute functions below do not enforce this themselves; they are
/// total over any answer subset. Callers validate first, then compute.
pub fn validate_submission(answers: &[Answer], catalog: &QuestionCatalog) -> Result<(), AppError> {
    let mut seen: HashSet<u32> = HashSet::with_capacity(answers.len());
    for answer in answers {
        if !catalog.contains(answer.question_id) {
            return Err(AppError::InvalidAnswer {
                question_id: answer.question_id,
            });
        }
        if !seen.insert(answer.question_id) {
            return Err(AppError::DuplicateAnswer {
                question_id: answer.question_id,
            });
        }
    }
    if seen.len() != catalog.len() {
        return Err(AppError::IncompleteSubmission {
            answered: seen.len(),
            expected: catalog.len(),
        });
    }
    Ok(())
}

/// Compute the overall normalized score and its tendency label.
///
/// Each answer contributes the catalog weight of its chosen side. The
/// normalization bounds sum per-question min/max over the *whole* catalog,
/// so a complete submission always lands in [0, 100].
pub fn overall_score(answers: &[Answer], catalog: &QuestionCatalog) -> (u8, Tendency) {
    let total = raw_total(answers, catalog);
    let (min, max) = weight_bounds(catalog.questions().iter());
    let score = normalized_score(total, min, max);
    (score, tendency_for_score(score))
}

/// Compute one `CategoryScore` per distinct catalog category, in catalog
/// order, regardless of how many answers fall into each category.
///
/// The per-category bounds sum min/max over all of the category's questions
/// (not just the answered ones), so the denominator always reflects the
/// category's full possible range. A category with no range yields the
/// 50/center fallback instead of a division fault.
pub fn category_scores(
    answers: &[Answer],
    catalog: &QuestionCatalog,
    descriptions: &DescriptionTable,
) -> IndexMap<String, CategoryScore> {
    let mut scores = IndexMap::with_capacity(catalog.category_count());

    for (name, question_ids) in catalog.category_index() {
        let total = raw_total(
            answers
                .iter()
                .filter(|a| question_ids.contains(&a.question_id)),
            catalog,
        );
        let (min, max) = weight_bounds(catalog.category_questions(name));
        let score = normalized_score(total, min, max);
        let tendency = tendency_for_score(score);

        scores.insert(
            name.to_string(),
            CategoryScore {
                name: name.to_string(),
                score,
                tendency,
                description: descriptions.lookup(name, tendency).to_string(),
            },
        );
    }

    scores
}

/// Map a normalized score to its tendency bucket. Thresholds are fixed and
/// half-open with inclusive lower bounds: a score of exactly 30 is already
/// center-progressive, 70 is already conservative.
pub fn tendency_for_score(score: u8) -> Tendency {
    match score {
        0..=29 => Tendency::Progressive,
        30..=44 => Tendency::CenterProgressive,
        45..=54 => Tendency::Center,
        55..=69 => Tendency::CenterConservative,
        _ => Tendency::Conservative,
    }
}

/// Sum the catalog weight of each answer's chosen side. Answers whose id is
/// not in the catalog contribute nothing (the validation step rejects them
/// up front; this keeps the pure function total).
fn raw_total<'a>(answers: impl IntoIterator<Item = &'a Answer>, catalog: &QuestionCatalog) -> i64 {
    answers
        .into_iter()
        .filter_map(|a| catalog.question(a.question_id).map(|q| (a, q)))
        .map(|(a, q)| match a.choice {
            Choice::Left => i64::from(q.left_weight),
            Choice::Right => i64::from(q.right_weight),
        })
        .sum()
}

/// (min possible, max possible) raw totals for a set of questions, taking
/// per-question min/max so weight sign order never matters.
fn weight_bounds<'a>(questions: impl Iterator<Item = &'a Question>) -> (i64, i64) {
    questions.fold((0i64, 0i64), |(min, max), q| {
        (
            min + i64::from(q.min_weight()),
            max + i64::from(q.max_weight()),
        )
    })
}

/// Rescale a raw total into a 0-100 integer against [min, max]. A zero range
/// yields the documented fallback instead of dividing by zero; out-of-range
/// totals (possible only for partial answer sets) clamp.
fn normalized_score(total: i64, min: i64, max: i64) -> u8 {
    if max <= min {
        return ZERO_RANGE_SCORE;
    }
    let normalized = (total - min) as f64 / (max - min) as f64 * 100.0;
    normalized.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: u32, category: &str, left_weight: i32, right_weight: i32) -> Question {
        Question {
            id,
            category: category.to_string(),
            category_icon: String::new(),
            left: format!("left statement {id}"),
            right: format!("right statement {id}"),
            left_weight,
            right_weight,
        }
    }

    fn answer(q: &Question, choice: Choice) -> Answer {
        Answer {
            question_id: q.id,
            choice,
            left_weight: q.left_weight,
            right_weight: q.right_weight,
        }
    }

    fn answers_for(catalog: &QuestionCatalog, choices: &[Choice]) -> Vec<Answer> {
        catalog
            .questions()
            .iter()
            .zip(choices)
            .map(|(q, &c)| answer(q, c))
            .collect()
    }

    fn two_question_catalog() -> QuestionCatalog {
        QuestionCatalog::new(vec![
            question(1, "economy", -2, 2),
            question(2, "economy", -1, 1),
        ])
    }

    #[test]
    fn concrete_two_question_scenario() {
        // total = -3, min = -3, max = 3 -> round((-3 - -3) / 6 * 100) = 0
        let catalog = two_question_catalog();
        let answers = answers_for(&catalog, &[Choice::Left, Choice::Left]);
        let (score, label) = overall_score(&answers, &catalog);
        assert_eq!(score, 0);
        assert_eq!(label, Tendency::Progressive);
    }

    #[test]
    fn boundary_exactness_on_standard_catalog() {
        let catalog = QuestionCatalog::standard();

        let all_left = answers_for(&catalog, &[Choice::Left; 12]);
        let (score, label) = overall_score(&all_left, &catalog);
        assert_eq!((score, label), (0, Tendency::Progressive));

        let all_right = answers_for(&catalog, &[Choice::Right; 12]);
        let (score, label) = overall_score(&all_right, &catalog);
        assert_eq!((score, label), (100, Tendency::Conservative));
    }

    #[test]
    fn range_invariant_over_all_answer_combinations() {
        let catalog = QuestionCatalog::new(vec![
            question(1, "a", -2, 2),
            question(2, "a", -1, 2),
            question(3, "b", -1, 1),
        ]);
        for bits in 0..(1u32 << 3) {
            let choices: Vec<Choice> = (0..3)
                .map(|i| {
                    if bits & (1 << i) == 0 {
                        Choice::Left
                    } else {
                        Choice::Right
                    }
                })
                .collect();
            let answers = answers_for(&catalog, &choices);
            let (score, _) = overall_score(&answers, &catalog);
            assert!(score <= 100, "score {score} out of range for bits {bits:b}");
        }
    }

    #[test]
    fn monotonic_under_single_answer_shift() {
        let catalog = QuestionCatalog::new(vec![
            question(1, "a", -2, 2),
            question(2, "a", -1, 2),
            question(3, "b", -1, 1),
        ]);
        for bits in 0..(1u32 << 3) {
            let choices: Vec<Choice> = (0..3)
                .map(|i| {
                    if bits & (1 << i) == 0 {
                        Choice::Left
                    } else {
                        Choice::Right
                    }
                })
                .collect();
            for flip in 0..3 {
                if choices[flip] == Choice::Right {
                    continue;
                }
                let mut shifted = choices.clone();
                shifted[flip] = Choice::Right;

                let (before, _) = overall_score(&answers_for(&catalog, &choices), &catalog);
                let (after, _) = overall_score(&answers_for(&catalog, &shifted), &catalog);
                assert!(
                    after >= before,
                    "shifting question {flip} right dropped score {before} -> {after}"
                );
            }
        }
    }

    #[test]
    fn threshold_edges_land_in_upper_bucket() {
        assert_eq!(tendency_for_score(0), Tendency::Progressive);
        assert_eq!(tendency_for_score(29), Tendency::Progressive);
        assert_eq!(tendency_for_score(30), Tendency::CenterProgressive);
        assert_eq!(tendency_for_score(44), Tendency::CenterProgressive);
        assert_eq!(tendency_for_score(45), Tendency::Center);
        assert_eq!(tendency_for_score(54), Tendency::Center);
        assert_eq!(tendency_for_score(55), Tendency::CenterConservative);
        assert_eq!(tendency_for_score(69), Tendency::CenterConservative);
        assert_eq!(tendency_for_score(70), Tendency::Conservative);
        assert_eq!(tendency_for_score(100), Tendency::Conservative);
    }

    #[test]
    fn one_category_score_per_catalog_category() {
        let catalog = QuestionCatalog::new(vec![
            question(1, "a", -2, 2),
            question(2, "b", -1, 1),
            question(3, "c", -2, 2),
            question(4, "c", -1, 1),
        ]);
        let descriptions = DescriptionTable::new();

        // No answers at all: still one entry per category
        let scores = category_scores(&[], &catalog, &descriptions);
        assert_eq!(scores.len(), 3);
        assert_eq!(
            scores.keys().collect::<Vec<_>>(),
            vec!["a", "b", "c"],
            "entries follow catalog order"
        );

        // Partial answers: same shape
        let q1 = &catalog.questions()[0];
        let scores = category_scores(&[answer(q1, Choice::Right)], &catalog, &descriptions);
        assert_eq!(scores.len(), 3);
        assert_eq!(scores["a"].score, 100);
    }

    #[test]
    fn category_scoring_uses_full_category_range() {
        let catalog = QuestionCatalog::new(vec![
            question(1, "a", -2, 2),
            question(2, "a", -2, 2),
        ]);
        let descriptions = DescriptionTable::new();

        // Only one of two questions answered (right): total = 2 over range
        // [-4, 4] -> round(6/8*100) = 75
        let q1 = &catalog.questions()[0];
        let scores = category_scores(&[answer(q1, Choice::Right)], &catalog, &descriptions);
        assert_eq!(scores["a"].score, 75);
        assert_eq!(scores["a"].tendency, Tendency::Conservative);
    }

    #[test]
    fn degenerate_zero_range_category_falls_back() {
        let catalog = QuestionCatalog::new(vec![
            question(1, "flat", 1, 1),
            question(2, "flat", -3, -3),
            question(3, "normal", -2, 2),
        ]);
        let descriptions = DescriptionTable::new();

        let answers: Vec<Answer> = catalog
            .questions()
            .iter()
            .map(|q| answer(q, Choice::Left))
            .collect();
        let scores = category_scores(&answers, &catalog, &descriptions);

        let flat = &scores["flat"];
        assert_eq!(flat.score, 50);
        assert_eq!(flat.tendency, Tendency::Center);
        assert_eq!(flat.description, crate::descriptions::PENDING_DESCRIPTION);

        assert_eq!(scores["normal"].score, 0);
    }

    #[test]
    fn empty_catalog_overall_falls_back() {
        let catalog = QuestionCatalog::new(vec![]);
        let (score, label) = overall_score(&[], &catalog);
        assert_eq!((score, label), (50, Tendency::Center));
    }

    #[test]
    fn stale_denormalized_weights_are_ignored() {
        let catalog = two_question_catalog();
        let mut answers = answers_for(&catalog, &[Choice::Left, Choice::Left]);
        // A client still running an older catalog revision sends wrong copies
        answers[0].left_weight = -100;
        answers[1].right_weight = 100;
        let (score, label) = overall_score(&answers, &catalog);
        assert_eq!((score, label), (0, Tendency::Progressive));
    }

    #[test]
    fn scoring_is_deterministic() {
        let catalog = QuestionCatalog::standard();
        let descriptions = DescriptionTable::standard();
        let answers = answers_for(
            &catalog,
            &[
                Choice::Left,
                Choice::Right,
                Choice::Left,
                Choice::Right,
                Choice::Left,
                Choice::Right,
                Choice::Left,
                Choice::Right,
                Choice::Left,
                Choice::Right,
                Choice::Left,
                Choice::Right,
            ],
        );

        let first = overall_score(&answers, &catalog);
        let second = overall_score(&answers, &catalog);
        assert_eq!(first, second);

        let a = serde_json::to_string(&category_scores(&answers, &catalog, &descriptions)).unwrap();
        let b = serde_json::to_string(&category_scores(&answers, &catalog, &descriptions)).unwrap();
        assert_eq!(a, b, "serialized category output must be byte-identical");
    }

    #[test]
    fn category_descriptions_come_from_the_table() {
        let catalog = QuestionCatalog::standard();
        let descriptions = DescriptionTable::standard();
        let all_left = answers_for(&catalog, &[Choice::Left; 12]);

        let scores = category_scores(&all_left, &catalog, &descriptions);
        assert_eq!(scores.len(), 6);
        let economy = &scores["경제 / 복지"];
        assert_eq!(economy.tendency, Tendency::Progressive);
        assert_eq!(economy.description, "복지 확대와 경제적 평등을 중시");
    }

    #[test]
    fn validation_accepts_exactly_one_answer_per_question() {
        let catalog = two_question_catalog();
        let answers = answers_for(&catalog, &[Choice::Left, Choice::Right]);
        assert!(validate_submission(&answers, &catalog).is_ok());
    }

    #[test]
    fn validation_rejects_unknown_question() {
        let catalog = two_question_catalog();
        let mut answers = answers_for(&catalog, &[Choice::Left, Choice::Right]);
        answers[1].question_id = 99;
        match validate_submission(&answers, &catalog) {
            Err(AppError::InvalidAnswer { question_id: 99 }) => {}
            other => panic!("expected InvalidAnswer, got {other:?}"),
        }
    }

    #[test]
    fn validation_rejects_duplicate_answers() {
        let catalog = two_question_catalog();
        let q1 = &catalog.questions()[0];
        let answers = vec![
            answer(q1, Choice::Left),
            answer(q1, Choice::Right),
            answer(&catalog.questions()[1], Choice::Left),
        ];
        match validate_submission(&answers, &catalog) {
            Err(AppError::DuplicateAnswer { question_id: 1 }) => {}
            other => panic!("expected DuplicateAnswer, got {other:?}"),
        }
    }

    #[test]
    fn validation_rejects_incomplete_submission() {
        let catalog = two_question_catalog();
        let q1 = &catalog.questions()[0];
        let answers = vec![answer(q1, Choice::Left)];
        match validate_submission(&answers, &catalog) {
            Err(AppError::IncompleteSubmission {
                answered: 1,
                expected: 2,
            }) => {}
            other => panic!("expected IncompleteSubmission, got {other:?}"),
        }
    }
}
