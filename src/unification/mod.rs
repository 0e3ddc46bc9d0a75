//! Matching and instantiation for first-order terms

#[path = "match.rs"]
mod match_;


pub use match_::{match_pattern, match_with_bindings, MatchError, MatchResult};
