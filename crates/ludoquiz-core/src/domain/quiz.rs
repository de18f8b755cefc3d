//! Quiz content model, as delivered by the content source.
//!
//! Authoring rules (answer counts, exactly one correct answer) are enforced
//! upstream; this is only the read shape plus grading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::document::Document;
use super::errors::QuizError;
use super::ids::QuizId;
use super::result::QuizResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    #[serde(rename = "_id")]
    pub id: QuizId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<Slug>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Document,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slug {
    pub current: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub answer: String,
    #[serde(default)]
    pub is_correct: bool,
}

impl Question {
    pub fn is_correct(&self, choice: usize) -> Option<bool> {
        self.answers.get(choice).map(|a| a.is_correct)
    }
}

impl Quiz {
    pub fn slug(&self) -> Option<&str> {
        self.slug.as_ref().map(|s| s.current.as_str())
    }

    /// Grade one attempt.
    ///
    /// `choices[i]` is the index of the answer picked for question `i`.
    /// Score is the number of questions answered correctly.
    pub fn grade(&self, choices: &[usize]) -> Result<QuizResult, QuizError> {
        if choices.len() != self.questions.len() {
            return Err(QuizError::AnswerCountMismatch {
                expected: self.questions.len(),
                got: choices.len(),
            });
        }
        let mut score = 0;
        for (index, (question, &choice)) in self.questions.iter().zip(choices).enumerate() {
            let correct = question
                .is_correct(choice)
                .ok_or(QuizError::AnswerOutOfRange {
                    question: index,
                    choice,
                })?;
            if correct {
                score += 1;
            }
        }
        Ok(QuizResult::new(self.id.clone(), score))
    }
}
