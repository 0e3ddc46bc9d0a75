//! Facts, rules, and the support graph that ties them together

use crate::logic::{Interner, Term};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a fact in the knowledge-base arena
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FactId(pub(crate) u32);

/// Handle to a rule in the knowledge-base arena
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleId(pub(crate) u32);

impl FactId {
    /// Get the raw ID value
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl RuleId {
    /// Get the raw ID value
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}", self.0)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Handle to either kind of entity, used by the retraction walk
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityId {
    Fact(FactId),
    Rule(RuleId),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Fact(id) => write!(f, "{}", id),
            EntityId::Rule(id) => write!(f, "{}", id),
        }
    }
}

/// The exact (fact, rule) combination whose resolution produced an entity
///
/// A single fact or rule carries multiple pairs when it is re-derived via
/// different routes. Pairs reference arena handles, never the entities
/// themselves; back-references on the antecedents are the exact inverse.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportPair {
    pub fact: FactId,
    pub rule: RuleId,
}

impl SupportPair {
    /// Create a support pair from its antecedent handles
    pub fn new(fact: FactId, rule: RuleId) -> Self {
        SupportPair { fact, rule }
    }

    /// Check whether this pair names the given entity as an antecedent
    pub fn names(&self, entity: EntityId) -> bool {
        match entity {
            EntityId::Fact(id) => self.fact == id,
            EntityId::Rule(id) => self.rule == id,
        }
    }

    /// The antecedent on the opposite side of `entity` in this pair
    pub fn partner_of(&self, entity: EntityId) -> EntityId {
        match entity {
            EntityId::Fact(_) => EntityId::Rule(self.rule),
            EntityId::Rule(_) => EntityId::Fact(self.fact),
        }
    }
}

/// A fact: a single statement plus its truth-maintenance bookkeeping
///
/// Identity is structural on `statement` alone; the knowledge base holds at
/// most one fact per distinct statement. `asserted` and `supported_by` track
/// why the fact is believed; the `supports_*` lists are derived
/// back-references used only for cascade lookup during retraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fact {
    pub statement: Term,
    pub asserted: bool,
    pub supported_by: Vec<SupportPair>,
    pub supports_facts: Vec<FactId>,
    pub supports_rules: Vec<RuleId>,
}

impl Fact {
    /// Create an externally asserted fact with no support
    pub fn new(statement: Term) -> Self {
        Fact {
            statement,
            asserted: true,
            supported_by: Vec::new(),
            supports_facts: Vec::new(),
            supports_rules: Vec::new(),
        }
    }

    /// Format this fact with an interner for name resolution
    pub fn display<'a>(&'a self, interner: &'a Interner) -> FactDisplay<'a> {
        FactDisplay {
            fact: self,
            interner,
        }
    }
}

impl PartialEq for Fact {
    fn eq(&self, other: &Self) -> bool {
        self.statement == other.statement
    }
}

impl Eq for Fact {}

/// A rule: ordered antecedents implying a consequent
///
/// Antecedent order is load-bearing: forward chaining consumes `lhs[0]` only,
/// producing a residual rule over the remaining antecedents. Identity is
/// structural on `(lhs, rhs)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub lhs: Vec<Term>,
    pub rhs: Term,
    pub asserted: bool,
    pub supported_by: Vec<SupportPair>,
    pub supports_facts: Vec<FactId>,
    pub supports_rules: Vec<RuleId>,
}

impl Rule {
    /// Create an externally asserted rule with no support
    pub fn new(lhs: Vec<Term>, rhs: Term) -> Self {
        Rule {
            lhs,
            rhs,
            asserted: true,
            supported_by: Vec::new(),
            supports_facts: Vec::new(),
            supports_rules: Vec::new(),
        }
    }

    /// Format this rule with an interner for name resolution
    pub fn display<'a>(&'a self, interner: &'a Interner) -> RuleDisplay<'a> {
        RuleDisplay {
            rule: self,
            interner,
        }
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.lhs == other.lhs && self.rhs == other.rhs
    }
}

impl Eq for Rule {}

/// A unit of knowledge: either a fact or a rule
///
/// The sum type mirrors the dynamic dispatch of the public operations:
/// `ask` rejects rule-shaped queries and `retract` ignores rules entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Knowledge {
    Fact(Fact),
    Rule(Rule),
}

impl From<Fact> for Knowledge {
    fn from(fact: Fact) -> Self {
        Knowledge::Fact(fact)
    }
}

impl From<Rule> for Knowledge {
    fn from(rule: Rule) -> Self {
        Knowledge::Rule(rule)
    }
}

// Display wrappers

/// Display wrapper for Fact that includes an interner for name resolution
pub struct FactDisplay<'a> {
    fact: &'a Fact,
    interner: &'a Interner,
}

impl fmt::Display for FactDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fact: {}", self.fact.statement.display(self.interner))
    }
}

/// Display wrapper for Rule that includes an interner for name resolution
pub struct RuleDisplay<'a> {
    rule: &'a Rule,
    interner: &'a Interner,
}

impl fmt::Display for RuleDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule: (")?;
        for (i, antecedent) in self.rule.lhs.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", antecedent.display(self.interner))?;
        }
        write!(f, ") -> {}", self.rule.rhs.display(self.interner))
    }
}
