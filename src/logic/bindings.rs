//! Variable bindings and term instantiation

use super::interner::VariableId;
use super::term::{Term, Variable};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A binding set mapping variables to terms
///
/// Backed by an `IndexMap` so iteration order follows insertion order, which
/// keeps query answers deterministic. Within one match a variable binds to
/// exactly one term; consistency is enforced by the matcher, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bindings {
    map: IndexMap<VariableId, Term>,
}

impl Bindings {
    /// Create a new empty binding set
    pub fn new() -> Self {
        Bindings {
            map: IndexMap::new(),
        }
    }

    /// Add a variable -> term binding
    pub fn insert(&mut self, var: Variable, term: Term) {
        self.map.insert(var.id, term);
    }

    /// Get the term bound to a variable, if any
    pub fn get(&self, var_id: VariableId) -> Option<&Term> {
        self.map.get(&var_id)
    }

    /// Check if a variable is bound
    pub fn contains(&self, var_id: VariableId) -> bool {
        self.map.contains_key(&var_id)
    }

    /// Number of bound variables
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if no variables are bound
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over bindings in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&VariableId, &Term)> {
        self.map.iter()
    }
}

impl Term {
    /// Instantiate this term under a binding set
    ///
    /// Every variable present in `bindings` is replaced by its bound term; a
    /// bound term may itself contain bound variables, so the chain is chased
    /// to a fixpoint (the matcher's occurs check keeps chains acyclic).
    /// Variables absent from the bindings are left in place: partial
    /// instantiation is legal and expected when a multi-antecedent rule is
    /// specialized one antecedent at a time.
    pub fn instantiate(&self, bindings: &Bindings) -> Term {
        match self {
            Term::Variable(v) => match bindings.get(v.id) {
                Some(term) => term.instantiate(bindings),
                None => self.clone(),
            },
            Term::Constant(_) => self.clone(),
            Term::Predicate(pred, args) => Term::Predicate(
                *pred,
                args.iter().map(|arg| arg.instantiate(bindings)).collect(),
            ),
        }
    }
}
