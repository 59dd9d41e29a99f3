//! Mock-interview quiz: grading and performance stats.

pub mod handlers;

use serde::{Deserialize, Serialize};

use crate::models::AssessmentRow;

/// One multiple-choice question as produced by the AI generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
}

/// Per-question review after grading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizReview {
    pub question: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResult {
    /// Percentage score, 0.0–100.0.
    pub quiz_score: f64,
    pub questions: Vec<QuizReview>,
    pub improvement_tip: Option<String>,
}

/// Grades submitted answers against the quiz. Answers pair with questions
/// by index; a missing answer counts as incorrect. An empty quiz scores 0.
pub fn grade(questions: &[QuizQuestion], answers: &[String]) -> QuizResult {
    let reviews: Vec<QuizReview> = questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let user_answer = answers.get(i).cloned().unwrap_or_default();
            let is_correct = user_answer == q.correct_answer;
            QuizReview {
                question: q.question.clone(),
                user_answer,
                correct_answer: q.correct_answer.clone(),
                is_correct,
                explanation: q.explanation.clone(),
            }
        })
        .collect();

    let quiz_score = if reviews.is_empty() {
        0.0
    } else {
        let correct = reviews.iter().filter(|r| r.is_correct).count();
        correct as f64 / reviews.len() as f64 * 100.0
    };

    QuizResult {
        quiz_score,
        questions: reviews,
        improvement_tip: None,
    }
}

/// The questions answered incorrectly, in quiz order.
pub fn wrong_answers(result: &QuizResult) -> Vec<&QuizReview> {
    result.questions.iter().filter(|r| !r.is_correct).collect()
}

/// Aggregate stats over saved assessments (most recent first).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentStats {
    pub average_score: f64,
    pub total_questions: usize,
    pub latest_score: Option<f64>,
}

pub fn assessment_stats(assessments: &[AssessmentRow]) -> AssessmentStats {
    if assessments.is_empty() {
        return AssessmentStats {
            average_score: 0.0,
            total_questions: 0,
            latest_score: None,
        };
    }

    let total: f64 = assessments.iter().map(|a| a.quiz_score).sum();
    let total_questions = assessments
        .iter()
        .map(|a| a.questions.as_array().map(Vec::len).unwrap_or(0))
        .sum();

    AssessmentStats {
        average_score: total / assessments.len() as f64,
        total_questions,
        // Assessments are ordered most-recent-first.
        latest_score: Some(assessments[0].quiz_score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    fn question(text: &str, answer: &str) -> QuizQuestion {
        QuizQuestion {
            question: text.to_string(),
            options: vec![
                "A".to_string(),
                "B".to_string(),
                "C".to_string(),
                "D".to_string(),
            ],
            correct_answer: answer.to_string(),
            explanation: format!("The answer is {answer}"),
        }
    }

    fn assessment(score: f64, question_count: usize) -> AssessmentRow {
        AssessmentRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            quiz_score: score,
            questions: json!(vec![json!({}); question_count]),
            category: "Technical".to_string(),
            improvement_tip: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_grade_all_correct() {
        let questions = vec![question("Q1", "A"), question("Q2", "B")];
        let result = grade(&questions, &["A".to_string(), "B".to_string()]);
        assert_eq!(result.quiz_score, 100.0);
        assert!(result.questions.iter().all(|r| r.is_correct));
    }

    #[test]
    fn test_grade_half_correct() {
        let questions = vec![question("Q1", "A"), question("Q2", "B")];
        let result = grade(&questions, &["A".to_string(), "C".to_string()]);
        assert_eq!(result.quiz_score, 50.0);
        assert!(result.questions[0].is_correct);
        assert!(!result.questions[1].is_correct);
        assert_eq!(result.questions[1].user_answer, "C");
        assert_eq!(result.questions[1].correct_answer, "B");
    }

    #[test]
    fn test_grade_missing_answers_count_as_incorrect() {
        let questions = vec![question("Q1", "A"), question("Q2", "B")];
        let result = grade(&questions, &["A".to_string()]);
        assert_eq!(result.quiz_score, 50.0);
        assert_eq!(result.questions[1].user_answer, "");
        assert!(!result.questions[1].is_correct);
    }

    #[test]
    fn test_grade_empty_quiz_scores_zero() {
        let result = grade(&[], &[]);
        assert_eq!(result.quiz_score, 0.0);
        assert!(result.questions.is_empty());
    }

    #[test]
    fn test_review_preserves_quiz_order() {
        let questions = vec![question("First?", "A"), question("Second?", "B")];
        let result = grade(&questions, &[]);
        assert_eq!(result.questions[0].question, "First?");
        assert_eq!(result.questions[1].question, "Second?");
    }

    #[test]
    fn test_wrong_answers_filters_correct_ones() {
        let questions = vec![question("Q1", "A"), question("Q2", "B")];
        let result = grade(&questions, &["A".to_string(), "C".to_string()]);
        let wrong = wrong_answers(&result);
        assert_eq!(wrong.len(), 1);
        assert_eq!(wrong[0].question, "Q2");
    }

    #[test]
    fn test_stats_empty() {
        let stats = assessment_stats(&[]);
        assert_eq!(stats.average_score, 0.0);
        assert_eq!(stats.total_questions, 0);
        assert_eq!(stats.latest_score, None);
    }

    #[test]
    fn test_stats_average_total_and_latest() {
        // Most recent first: 90 is the latest score.
        let rows = vec![assessment(90.0, 10), assessment(70.0, 10), assessment(50.0, 5)];
        let stats = assessment_stats(&rows);
        assert_eq!(stats.average_score, 70.0);
        assert_eq!(stats.total_questions, 25);
        assert_eq!(stats.latest_score, Some(90.0));
    }
}
