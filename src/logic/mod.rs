//! Term model: interned symbols, terms, and variable bindings

pub mod bindings;
pub mod interner;
pub mod term;

pub use bindings::Bindings;
pub use interner::{ConstantId, Interner, PredicateId, VariableId};
pub use term::{Constant, PredicateSymbol, Term, TermDisplay, Variable};
