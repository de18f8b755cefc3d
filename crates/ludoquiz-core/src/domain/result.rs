//! QuizResult - the outcome of one quiz attempt.

use serde::{Deserialize, Serialize};

use super::ids::QuizId;

/// One stored result per quiz.
///
/// `score` is the number of correctly answered questions. The stored record
/// for an id always carries the best score ever submitted for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub id: QuizId,
    pub score: u32,
}

impl QuizResult {
    pub fn new(id: impl Into<QuizId>, score: u32) -> Self {
        Self {
            id: id.into(),
            score,
        }
    }

    /// Merge a newly submitted result into this stored one.
    ///
    /// Keeps the higher score. Submissions for another id are ignored.
    pub fn merge(&mut self, submitted: &QuizResult) {
        if self.id == submitted.id {
            self.score = self.score.max(submitted.score);
        }
    }

    /// Merge-on-submit against an optional existing record.
    pub fn merged_with(existing: Option<QuizResult>, submitted: QuizResult) -> QuizResult {
        match existing {
            Some(mut stored) => {
                stored.merge(&submitted);
                stored
            }
            None => submitted,
        }
    }
}
