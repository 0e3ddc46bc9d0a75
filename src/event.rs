//! Structured events emitted by knowledge-base operations
//!
//! Observability is a collaborator, not ambient state: the knowledge base is
//! constructed with an `EventSink` and a verbosity level, and every public
//! operation reports what it did through structured events. Events never
//! drive control flow.

use crate::kb::{EntityId, FactId, RuleId};
use crate::logic::Term;
use serde::{Deserialize, Serialize};

/// An event describing one step of a knowledge-base operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KbEvent {
    /// External assertion of a fact
    FactAsserted { statement: Term },
    /// External assertion of a rule
    RuleAsserted { lhs: Vec<Term>, rhs: Term },
    /// A new fact entered storage
    FactAdded { id: FactId },
    /// A new rule entered storage
    RuleAdded { id: RuleId },
    /// A duplicate insert merged support into the canonical instance
    SupportMerged { entity: EntityId },
    /// A duplicate support-free insert flipped the asserted flag
    AssertedFlagSet { entity: EntityId },
    /// A resolution step produced a new entity
    Derived {
        fact: FactId,
        rule: RuleId,
        result: EntityId,
    },
    /// A query was posed
    Asked { statement: Term },
    /// A rule-shaped query was rejected
    InvalidQuery,
    /// A retraction began on a present fact
    Retracting { fact: FactId },
    /// A retraction target or argument required no work
    RetractNoop,
    /// A support pair was withdrawn from a dependent
    SupportWithdrawn { from: EntityId, antecedent: EntityId },
    /// An entity left storage during a cascade
    Removed { entity: EntityId },
}

/// Destination for knowledge-base events
///
/// Injected at construction; implementations must not call back into the
/// knowledge base.
pub trait EventSink {
    /// Receive one event
    fn emit(&mut self, event: KbEvent);
}

/// Sink that discards every event
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: KbEvent) {}
}

/// Sink that records events in memory, mainly for tests and drivers
#[derive(Debug, Default)]
pub struct MemorySink {
    pub events: Vec<KbEvent>,
}

impl MemorySink {
    /// Create an empty memory sink
    pub fn new() -> Self {
        MemorySink { events: Vec::new() }
    }
}

impl EventSink for MemorySink {
    fn emit(&mut self, event: KbEvent) {
        self.events.push(event);
    }
}

// Lets a caller keep a handle on a sink it has handed to the knowledge base.
impl<S: EventSink> EventSink for std::rc::Rc<std::cell::RefCell<S>> {
    fn emit(&mut self, event: KbEvent) {
        self.borrow_mut().emit(event);
    }
}
