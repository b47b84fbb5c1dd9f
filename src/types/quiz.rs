//! Quiz and grading records

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// A model-authored question with a reference answer detailed enough to
/// grade against later.
///
/// The element is kept exactly as the model produced it: nothing beyond JSON
/// parsing is checked, so a missing field, a non-string value or a
/// non-object element all reach the caller unchanged. Use [`question`] and
/// [`answer`] for the usual string fields.
///
/// [`question`]: QuizItem::question
/// [`answer`]: QuizItem::answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuizItem(Value);

impl QuizItem {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self(json!({ "question": question.into(), "answer": answer.into() }))
    }

    /// `question` when it is present and a string
    pub fn question(&self) -> Option<&str> {
        self.0.get("question").and_then(Value::as_str)
    }

    /// `answer` when it is present and a string
    pub fn answer(&self) -> Option<&str> {
        self.0.get("answer").and_then(Value::as_str)
    }

    /// Any field of the element, as received
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for QuizItem {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// A question, its reference answer and the student's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question: String,
    /// Reference answer
    pub answer: String,
    pub user_answer: String,
}

impl AnswerRecord {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        user_answer: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            user_answer: user_answer.into(),
        }
    }

    /// Pair a quiz item with the student's answer. Fields that are missing
    /// or not strings become empty.
    pub fn from_item(item: &QuizItem, user_answer: impl Into<String>) -> Self {
        Self::new(
            item.question().unwrap_or_default(),
            item.answer().unwrap_or_default(),
            user_answer,
        )
    }
}

/// Grade for one question of a batch evaluation.
///
/// Both `question_number` (as reported by the model) and the position in the
/// returned list are exposed; they can disagree, and neither is treated as
/// authoritative here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub question_number: i64,
    pub is_correct: bool,
    /// Percent accuracy (0-100) as instructed in the batch prompt.
    pub score: f64,
    pub explanation: String,
}

impl Evaluation {
    /// Whether the model-reported number agrees with the zero-based position.
    pub fn matches_position(&self, index: usize) -> bool {
        self.question_number == index as i64 + 1
    }
}

/// Grade for a single answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEvaluation {
    pub is_correct: bool,
    /// Score in `0.0..=1.0` as instructed in the single-answer prompt.
    pub score: f64,
    pub explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_item_keeps_unexpected_fields() {
        let item: QuizItem = serde_json::from_value(serde_json::json!({
            "question": "Q1",
            "answer": "A1",
            "difficulty": "easy"
        }))
        .unwrap();
        assert_eq!(item.question(), Some("Q1"));
        assert_eq!(item.get("difficulty"), Some(&serde_json::json!("easy")));
    }

    #[test]
    fn quiz_item_distinguishes_missing_from_empty() {
        let missing = QuizItem::from(serde_json::json!({"question": "Q"}));
        let empty = QuizItem::from(serde_json::json!({"question": "Q", "answer": ""}));
        assert_eq!(missing.answer(), None);
        assert_eq!(empty.answer(), Some(""));
        assert_ne!(missing, empty);
    }

    #[test]
    fn quiz_item_serializes_as_received() {
        let raw = serde_json::json!({"question": 5, "answer": ["a", "b"]});
        let item = QuizItem::from(raw.clone());
        assert_eq!(item.question(), None);
        assert_eq!(serde_json::to_value(&item).unwrap(), raw);
    }

    #[test]
    fn answer_record_from_malformed_item_uses_empty_strings() {
        let item = QuizItem::from(serde_json::json!({"question": 5}));
        let record = AnswerRecord::from_item(&item, "mine");
        assert_eq!(record.question, "");
        assert_eq!(record.answer, "");
        assert_eq!(record.user_answer, "mine");
    }

    #[test]
    fn answer_record_wire_shape() {
        let record = AnswerRecord::new("Q", "A", "mine");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["userAnswer"], "mine");
    }

    #[test]
    fn evaluation_position_check() {
        let eval: Evaluation = serde_json::from_value(serde_json::json!({
            "questionNumber": 2,
            "isCorrect": true,
            "score": 90,
            "explanation": "good"
        }))
        .unwrap();
        assert!(eval.matches_position(1));
        assert!(!eval.matches_position(0));
        assert_eq!(eval.score, 90.0);
    }
}
