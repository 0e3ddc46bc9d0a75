//! Knowledge-base configuration types.

/// Verbosity levels for the event sink
///
/// Levels are ordered: a configured level admits every event at or below it.
/// `Ops` covers the public operations (assert, ask, retract); `Trace` adds
/// per-derivation and per-cascade detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Emit nothing
    Silent,
    /// Emit one event per public operation
    Ops,
    /// Emit derivation and cascade detail as well
    Trace,
}

/// Configuration for a knowledge base
#[derive(Debug, Clone)]
pub struct KbConfig {
    /// Maximum number of successful resolution steps a single assertion may
    /// trigger before aborting (0 means no limit)
    pub max_derivations: usize,
    /// Event filtering level for the injected sink
    pub verbosity: Verbosity,
}

impl Default for KbConfig {
    fn default() -> Self {
        KbConfig {
            max_derivations: 0, // 0 means no limit
            verbosity: Verbosity::Silent,
        }
    }
}
