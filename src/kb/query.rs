//! Query result types

use super::entity::FactId;
use crate::logic::Bindings;
use serde::{Deserialize, Serialize};

/// One successful match of a query against a stored fact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// Bindings that make the query equal to the matched statement
    pub bindings: Bindings,
    /// The stored facts justifying this answer
    pub support: Vec<FactId>,
}

/// Ordered collection of query answers
///
/// Answers appear in knowledge-base storage order. Empty on no match or on a
/// rule-shaped (invalid) query; never a hard failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    pub answers: Vec<Answer>,
}

impl QueryResult {
    /// Create an empty result
    pub fn empty() -> Self {
        QueryResult {
            answers: Vec::new(),
        }
    }

    /// Append one answer
    pub fn push(&mut self, bindings: Bindings, support: Vec<FactId>) {
        self.answers.push(Answer { bindings, support });
    }

    /// Number of answers
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    /// Check if no answers were found
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Iterate over answers in storage order
    pub fn iter(&self) -> impl Iterator<Item = &Answer> {
        self.answers.iter()
    }
}
