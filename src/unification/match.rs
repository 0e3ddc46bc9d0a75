//! Structural matching with an accumulating binding set

use crate::logic::{Bindings, ConstantId, PredicateId, Term, Variable};
use std::fmt;

/// Result of a match attempt
pub type MatchResult = Result<Bindings, MatchError>;

/// Reasons a match can fail
///
/// Match failure is an expected, frequent outcome during forward chaining
/// and querying, not a fault; callers consume it locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// Predicate symbols don't match
    PredicateClash(PredicateId, PredicateId),
    /// Argument counts don't match
    ArityMismatch(usize, usize),
    /// Constant symbols don't match
    ConstantClash(ConstantId, ConstantId),
    /// Variable would bind to a term containing itself
    OccursCheck(Variable, Term),
    /// Structurally different term kinds (constant vs predicate)
    KindClash,
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::PredicateClash(p1, p2) => {
                write!(f, "predicate clash: {} vs {}", p1, p2)
            }
            MatchError::ArityMismatch(a1, a2) => {
                write!(f, "arity mismatch: {} vs {}", a1, a2)
            }
            MatchError::ConstantClash(c1, c2) => {
                write!(f, "constant clash: {} vs {}", c1, c2)
            }
            MatchError::OccursCheck(v, t) => {
                write!(f, "occurs check: {} in {}", v.id, t)
            }
            MatchError::KindClash => write!(f, "term kind clash"),
        }
    }
}

impl std::error::Error for MatchError {}

/// Match two terms, returning the binding set that makes them equal
///
/// A variable on either side may bind to the opposite term; once bound, every
/// further occurrence must be consistent with the prior binding under the
/// shared, accumulating binding set. Predicates match only when symbol and
/// arity agree and all arguments match.
pub fn match_pattern(pattern: &Term, candidate: &Term) -> MatchResult {
    let mut bindings = Bindings::new();
    match_with_bindings(pattern, candidate, &mut bindings)?;
    Ok(bindings)
}

/// Match two terms under an existing binding set
pub fn match_with_bindings(
    left: &Term,
    right: &Term,
    bindings: &mut Bindings,
) -> Result<(), MatchError> {
    // Consistency: a bound variable stands for its binding everywhere
    let t1 = left.instantiate(bindings);
    let t2 = right.instantiate(bindings);

    match (&t1, &t2) {
        // Identical after instantiation, nothing to do
        _ if t1 == t2 => Ok(()),

        // Variable on either side binds to the opposite term
        (Term::Variable(v), t) | (t, Term::Variable(v)) => {
            if t.contains_variable(*v) {
                Err(MatchError::OccursCheck(*v, t.clone()))
            } else {
                bindings.insert(*v, t.clone());
                Ok(())
            }
        }

        (Term::Constant(c1), Term::Constant(c2)) => {
            Err(MatchError::ConstantClash(c1.id, c2.id))
        }

        (Term::Predicate(p1, args1), Term::Predicate(p2, args2)) => {
            if p1.id != p2.id {
                return Err(MatchError::PredicateClash(p1.id, p2.id));
            }
            if args1.len() != args2.len() {
                return Err(MatchError::ArityMismatch(args1.len(), args2.len()));
            }

            for (arg1, arg2) in args1.iter().zip(args2.iter()) {
                match_with_bindings(arg1, arg2, bindings)?;
            }
            Ok(())
        }

        (Term::Constant(_), Term::Predicate(_, _))
        | (Term::Predicate(_, _), Term::Constant(_)) => Err(MatchError::KindClash),
    }
}
