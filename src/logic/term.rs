//! Terms: constants, variables, and predicate statements

use super::interner::{ConstantId, Interner, PredicateId, VariableId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A variable
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variable {
    pub id: VariableId,
}

impl Variable {
    /// Create a variable from an interned ID
    pub fn new(id: VariableId) -> Self {
        Variable { id }
    }
}

/// A constant symbol
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Constant {
    pub id: ConstantId,
}

impl Constant {
    /// Create a constant from an interned ID
    pub fn new(id: ConstantId) -> Self {
        Constant { id }
    }
}

/// A predicate symbol with arity
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PredicateSymbol {
    pub id: PredicateId,
    pub arity: u8,
}

impl PredicateSymbol {
    /// Create a predicate symbol from an ID and arity
    pub fn new(id: PredicateId, arity: u8) -> Self {
        PredicateSymbol { id, arity }
    }

    /// Get the name of this predicate symbol from the interner
    pub fn name<'a>(&self, interner: &'a Interner) -> &'a str {
        interner.resolve_predicate(self.id)
    }
}

/// A term: constant, variable, or predicate applied to argument terms
///
/// Immutable once constructed. `Hash + Eq` are structural, so a `Term` can
/// serve directly as a dedup key for knowledge-base storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    Variable(Variable),
    Constant(Constant),
    Predicate(PredicateSymbol, Vec<Term>),
}

impl Term {
    /// Check whether this term contains no variables
    pub fn is_ground(&self) -> bool {
        match self {
            Term::Variable(_) => false,
            Term::Constant(_) => true,
            Term::Predicate(_, args) => args.iter().all(|arg| arg.is_ground()),
        }
    }

    /// Collect all variables in this term
    pub fn collect_variables(&self, vars: &mut HashSet<Variable>) {
        match self {
            Term::Variable(v) => {
                vars.insert(*v);
            }
            Term::Constant(_) => {}
            Term::Predicate(_, args) => {
                for arg in args {
                    arg.collect_variables(vars);
                }
            }
        }
    }

    /// Check whether a variable occurs anywhere in this term
    pub fn contains_variable(&self, var: Variable) -> bool {
        match self {
            Term::Variable(v) => v.id == var.id,
            Term::Constant(_) => false,
            Term::Predicate(_, args) => args.iter().any(|arg| arg.contains_variable(var)),
        }
    }

    /// Format this term with an interner for name resolution
    pub fn display<'a>(&'a self, interner: &'a Interner) -> TermDisplay<'a> {
        TermDisplay {
            term: self,
            interner,
        }
    }
}

/// Display wrapper for Term that includes an interner for name resolution
pub struct TermDisplay<'a> {
    term: &'a Term,
    interner: &'a Interner,
}

impl fmt::Display for TermDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.term {
            Term::Variable(v) => write!(f, "?{}", self.interner.resolve_variable(v.id)),
            Term::Constant(c) => write!(f, "{}", self.interner.resolve_constant(c.id)),
            Term::Predicate(pred, args) => {
                write!(f, "({}", pred.name(self.interner))?;
                for arg in args {
                    write!(f, " {}", arg.display(self.interner))?;
                }
                write!(f, ")")
            }
        }
    }
}

// Display implementation that shows IDs (for debugging without interner)
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(v) => write!(f, "?{}", v.id),
            Term::Constant(c) => write!(f, "{}", c.id),
            Term::Predicate(pred, args) => {
                write!(f, "({}", pred.id)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}
