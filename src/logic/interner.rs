//! Symbol interning for efficient comparison and compact storage
//!
//! Symbol names are replaced by u32 IDs so that terms compare and hash in
//! O(1) and clone without heap allocation. Each symbol kind has its own ID
//! type for type safety:
//! - `VariableId` for variables
//! - `ConstantId` for constants
//! - `PredicateId` for predicate symbols
//!
//! The interner is owned by the caller (parser, driver, tests) and passed by
//! reference where names must be resolved; the knowledge base itself only
//! stores IDs.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// ID for an interned variable name
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(pub(crate) u32);

/// ID for an interned constant name
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstantId(pub(crate) u32);

/// ID for an interned predicate symbol name
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PredicateId(pub(crate) u32);

impl VariableId {
    /// Get the raw ID value
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl ConstantId {
    /// Get the raw ID value
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl PredicateId {
    /// Get the raw ID value
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// Internal string arena for a single symbol kind
#[derive(Debug, Clone, Default)]
struct StringArena {
    /// Interned strings, indexed by ID
    strings: Vec<String>,
    /// Lookup table from string to ID
    lookup: HashMap<String, u32>,
}

impl StringArena {
    fn new() -> Self {
        StringArena {
            strings: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    /// Intern a string, returning its ID (get-or-create)
    fn intern(&mut self, name: &str) -> u32 {
        if let Some(&id) = self.lookup.get(name) {
            return id;
        }
        let id = self.strings.len() as u32;
        self.strings.push(name.to_string());
        self.lookup.insert(name.to_string(), id);
        id
    }

    /// Resolve an ID to its string
    fn resolve(&self, id: u32) -> &str {
        &self.strings[id as usize]
    }

    /// Get the ID for an already-interned string
    fn get(&self, name: &str) -> Option<u32> {
        self.lookup.get(name).copied()
    }

    /// Number of interned strings
    fn len(&self) -> usize {
        self.strings.len()
    }
}

/// Symbol interner for the term language
///
/// Stores all symbol names in separate arenas for variables, constants, and
/// predicates. Passed explicitly rather than held in global state.
#[derive(Debug, Clone, Default)]
pub struct Interner {
    variables: StringArena,
    constants: StringArena,
    predicates: StringArena,
}

impl Interner {
    /// Create a new empty interner
    pub fn new() -> Self {
        Interner {
            variables: StringArena::new(),
            constants: StringArena::new(),
            predicates: StringArena::new(),
        }
    }

    /// Intern a variable name, returning its ID (get-or-create)
    pub fn intern_variable(&mut self, name: &str) -> VariableId {
        VariableId(self.variables.intern(name))
    }

    /// Resolve a variable ID to its name
    pub fn resolve_variable(&self, id: VariableId) -> &str {
        self.variables.resolve(id.0)
    }

    /// Get the ID for an already-interned variable
    pub fn get_variable(&self, name: &str) -> Option<VariableId> {
        self.variables.get(name).map(VariableId)
    }

    /// Number of interned variables
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Intern a constant name, returning its ID (get-or-create)
    pub fn intern_constant(&mut self, name: &str) -> ConstantId {
        ConstantId(self.constants.intern(name))
    }

    /// Resolve a constant ID to its name
    pub fn resolve_constant(&self, id: ConstantId) -> &str {
        self.constants.resolve(id.0)
    }

    /// Get the ID for an already-interned constant
    pub fn get_constant(&self, name: &str) -> Option<ConstantId> {
        self.constants.get(name).map(ConstantId)
    }

    /// Number of interned constants
    pub fn constant_count(&self) -> usize {
        self.constants.len()
    }

    /// Intern a predicate name, returning its ID (get-or-create)
    pub fn intern_predicate(&mut self, name: &str) -> PredicateId {
        PredicateId(self.predicates.intern(name))
    }

    /// Resolve a predicate ID to its name
    pub fn resolve_predicate(&self, id: PredicateId) -> &str {
        self.predicates.resolve(id.0)
    }

    /// Get the ID for an already-interned predicate
    pub fn get_predicate(&self, name: &str) -> Option<PredicateId> {
        self.predicates.get(name).map(PredicateId)
    }

    /// Number of interned predicates
    pub fn predicate_count(&self) -> usize {
        self.predicates.len()
    }
}

// === Display implementations for debugging ===

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}", self.0)
    }
}

impl fmt::Display for ConstantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

impl fmt::Display for PredicateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

// === Serde implementations ===
// IDs serialize as bare u32; name resolution happens through the interner.

impl Serialize for VariableId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for VariableId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(VariableId)
    }
}

impl Serialize for ConstantId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ConstantId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(ConstantId)
    }
}

impl Serialize for PredicateId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PredicateId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(PredicateId)
    }
}
