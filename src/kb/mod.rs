//! Knowledge base: storage, forward chaining, queries, and truth maintenance

pub mod entity;
mod infer;
pub mod query;
pub mod store;

pub use entity::{EntityId, Fact, FactId, Knowledge, Rule, RuleId, SupportPair};
pub use query::{Answer, QueryResult};
pub use store::KnowledgeBase;

use std::fmt;

/// Errors from knowledge-base operations
///
/// Match failure during chaining or querying is not an error; these cover the
/// structural hardening cases only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KbError {
    /// A retraction cascade revisited an entity it had already removed,
    /// which only a cyclic support graph can produce
    CyclicSupport(EntityId),
    /// A single assertion exceeded the configured derivation limit
    DerivationLimit(usize),
}

impl fmt::Display for KbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KbError::CyclicSupport(entity) => {
                write!(f, "cyclic support graph detected at {}", entity)
            }
            KbError::DerivationLimit(limit) => {
                write!(f, "derivation limit of {} exceeded", limit)
            }
        }
    }
}

impl std::error::Error for KbError {}
