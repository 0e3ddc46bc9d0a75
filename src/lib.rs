//! factforge: a forward-chaining knowledge base with truth maintenance
//!
//! Facts and implication rules are stored in a single knowledge base; every
//! assertion forward-chains to saturation, deriving new facts and residual
//! rules one antecedent at a time. Retraction walks the support graph and
//! removes exactly the derivations that lose their last justification,
//! leaving independently supported knowledge in place.

pub mod config;
pub mod event;
pub mod kb;
pub mod logic;
pub mod parser;
pub mod unification;

// Re-export commonly used types from logic
pub use logic::{
    Bindings, Constant, ConstantId, Interner, PredicateId, PredicateSymbol, Term, Variable,
    VariableId,
};

// Re-export knowledge-base types
pub use kb::{
    Answer, EntityId, Fact, FactId, KbError, Knowledge, KnowledgeBase, QueryResult, Rule, RuleId,
    SupportPair,
};

pub use config::{KbConfig, Verbosity};
pub use event::{EventSink, KbEvent, MemorySink, NullSink};
pub use parser::{parse_fact, parse_program, parse_rule, ParseError};
pub use unification::{match_pattern, match_with_bindings, MatchError, MatchResult};
