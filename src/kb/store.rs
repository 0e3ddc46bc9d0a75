//! Knowledge-base storage, insertion, saturation, querying, and retraction
//!
//! ## Storage
//!
//! Facts and rules live in arenas (`Vec<Option<_>>`) addressed by stable
//! `FactId`/`RuleId` handles; the support graph references handles only, so
//! removal never invalidates other entities. Dedup indexes (`IndexMap` keyed
//! by structural content) give O(1) duplicate lookup while preserving
//! insertion order for queries and iteration.
//!
//! ## Propagation
//!
//! Every insertion of a genuinely new entity seeds a worklist: a new fact
//! fans out against every rule, a new rule against every fact, one resolution
//! step at a time. Derived entities that survive dedup are enqueued in turn,
//! so a single `assert` runs to full saturation. The dedup index doubles as
//! the visited set keyed by structural identity: a re-derived entity merges
//! its support and generates no further work.
//!
//! ## Retraction
//!
//! `retract` applies the truth-maintenance decision to its target: a
//! supported target survives with its asserted flag cleared; a support-free
//! target withdraws itself from every dependent's `supported_by` and is
//! deleted. A dependent left support-free and unasserted cascades the same
//! way; one still supported or still asserted survives untouched beyond the
//! withdrawn pairs. The walk is an
//! explicit queue with a removed-set; a dependent that was already removed by
//! the same cascade proves the support graph cyclic and aborts the operation.

use super::entity::{EntityId, Fact, FactId, Knowledge, Rule, RuleId, SupportPair};
use super::query::QueryResult;
use super::KbError;
use crate::config::{KbConfig, Verbosity};
use crate::event::{EventSink, KbEvent, NullSink};
use crate::logic::Term;
use crate::unification::match_pattern;
use indexmap::IndexMap;
use std::collections::{HashSet, VecDeque};

/// A forward-chaining knowledge base with truth maintenance
pub struct KnowledgeBase {
    facts: Vec<Option<Fact>>,
    rules: Vec<Option<Rule>>,
    /// Statement -> canonical fact, in insertion order
    fact_index: IndexMap<Term, FactId>,
    /// (lhs, rhs) -> canonical rule, in insertion order
    rule_index: IndexMap<(Vec<Term>, Term), RuleId>,
    config: KbConfig,
    sink: Box<dyn EventSink>,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::new()
    }
}

impl KnowledgeBase {
    /// Create an empty knowledge base with default configuration and no
    /// event reporting
    pub fn new() -> Self {
        Self::with_config(KbConfig::default(), Box::new(NullSink))
    }

    /// Create an empty knowledge base with explicit configuration and an
    /// injected event sink
    pub fn with_config(config: KbConfig, sink: Box<dyn EventSink>) -> Self {
        KnowledgeBase {
            facts: Vec::new(),
            rules: Vec::new(),
            fact_index: IndexMap::new(),
            rule_index: IndexMap::new(),
            config,
            sink,
        }
    }

    // === Public operations ===

    /// Assert a fact or rule
    ///
    /// Insertion triggers forward chaining to saturation: every derivable
    /// fact and residual rule is added before this returns. Only the logical
    /// content of `item` is asserted; external assertions always enter with
    /// `asserted = true` and no support.
    pub fn assert(&mut self, item: Knowledge) -> Result<(), KbError> {
        match item {
            Knowledge::Fact(fact) => {
                self.emit(Verbosity::Ops, KbEvent::FactAsserted {
                    statement: fact.statement.clone(),
                });
                let (id, new) = self.add_fact(fact.statement, Vec::new());
                if new {
                    self.saturate(EntityId::Fact(id))?;
                }
            }
            Knowledge::Rule(rule) => {
                self.emit(Verbosity::Ops, KbEvent::RuleAsserted {
                    lhs: rule.lhs.clone(),
                    rhs: rule.rhs.clone(),
                });
                let (id, new) = self.add_rule(rule.lhs, rule.rhs, Vec::new());
                if new {
                    self.saturate(EntityId::Rule(id))?;
                }
            }
        }
        Ok(())
    }

    /// Query the knowledge base with a fact-shaped pattern
    ///
    /// The query statement is matched against every stored fact in insertion
    /// order; rules are never searched. A rule-shaped query is invalid: it is
    /// reported through the event sink and answered with an empty result.
    /// Storage is never mutated.
    pub fn ask(&mut self, query: &Knowledge) -> QueryResult {
        let pattern = match query {
            Knowledge::Fact(fact) => &fact.statement,
            Knowledge::Rule(_) => {
                self.emit(Verbosity::Ops, KbEvent::InvalidQuery);
                return QueryResult::empty();
            }
        };
        self.emit(Verbosity::Ops, KbEvent::Asked {
            statement: pattern.clone(),
        });

        let mut result = QueryResult::empty();
        for (statement, &id) in self.fact_index.iter() {
            if let Ok(bindings) = match_pattern(pattern, statement) {
                result.push(bindings, vec![id]);
            }
        }
        result
    }

    /// Retract a fact
    ///
    /// A supported fact survives with its asserted flag cleared; a
    /// support-free fact is removed along with every unasserted derivation
    /// that loses its last justification. Rules and absent facts are a no-op: rule
    /// retraction is deliberately not offered through the public surface.
    pub fn retract(&mut self, item: &Knowledge) -> Result<(), KbError> {
        let statement = match item {
            Knowledge::Fact(fact) => &fact.statement,
            Knowledge::Rule(_) => {
                self.emit(Verbosity::Ops, KbEvent::RetractNoop);
                return Ok(());
            }
        };
        let Some(&id) = self.fact_index.get(statement) else {
            self.emit(Verbosity::Ops, KbEvent::RetractNoop);
            return Ok(());
        };
        self.emit(Verbosity::Ops, KbEvent::Retracting { fact: id });
        self.retract_entity(EntityId::Fact(id))
    }

    // === Accessors ===

    /// Look up a fact by handle
    pub fn fact(&self, id: FactId) -> Option<&Fact> {
        self.facts.get(id.0 as usize)?.as_ref()
    }

    /// Look up a rule by handle
    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(id.0 as usize)?.as_ref()
    }

    /// Handle of the canonical fact for a statement, if present
    pub fn fact_id(&self, statement: &Term) -> Option<FactId> {
        self.fact_index.get(statement).copied()
    }

    /// Handle of the canonical rule for (lhs, rhs), if present
    pub fn rule_id(&self, lhs: &[Term], rhs: &Term) -> Option<RuleId> {
        self.rule_index.get(&(lhs.to_vec(), rhs.clone())).copied()
    }

    /// Check whether a statement is stored as a fact
    pub fn contains_fact(&self, statement: &Term) -> bool {
        self.fact_index.contains_key(statement)
    }

    /// Number of live facts
    pub fn fact_count(&self) -> usize {
        self.fact_index.len()
    }

    /// Number of live rules
    pub fn rule_count(&self) -> usize {
        self.rule_index.len()
    }

    /// Iterate over live facts in insertion order
    pub fn facts(&self) -> impl Iterator<Item = (FactId, &Fact)> {
        self.fact_index
            .values()
            .filter_map(move |&id| self.fact(id).map(|fact| (id, fact)))
    }

    /// Iterate over live rules in insertion order
    pub fn rules(&self) -> impl Iterator<Item = (RuleId, &Rule)> {
        self.rule_index
            .values()
            .filter_map(move |&id| self.rule(id).map(|rule| (id, rule)))
    }

    // === Insertion and saturation ===

    pub(crate) fn emit(&mut self, level: Verbosity, event: KbEvent) {
        if self.config.verbosity >= level {
            self.sink.emit(event);
        }
    }

    pub(crate) fn fact_mut(&mut self, id: FactId) -> Option<&mut Fact> {
        self.facts.get_mut(id.0 as usize)?.as_mut()
    }

    pub(crate) fn rule_mut(&mut self, id: RuleId) -> Option<&mut Rule> {
        self.rules.get_mut(id.0 as usize)?.as_mut()
    }

    /// Insert a fact or merge it into the canonical instance
    ///
    /// Returns the canonical handle and whether the fact was new. A duplicate
    /// with incoming support appends only pairs not already present; a
    /// duplicate without support flips the asserted flag.
    pub(crate) fn add_fact(&mut self, statement: Term, support: Vec<SupportPair>) -> (FactId, bool) {
        if let Some(&id) = self.fact_index.get(&statement) {
            self.merge_support(EntityId::Fact(id), support);
            return (id, false);
        }

        let id = FactId(self.facts.len() as u32);
        let asserted = support.is_empty();
        self.facts.push(Some(Fact {
            statement: statement.clone(),
            asserted,
            supported_by: support,
            supports_facts: Vec::new(),
            supports_rules: Vec::new(),
        }));
        self.fact_index.insert(statement, id);
        self.emit(Verbosity::Trace, KbEvent::FactAdded { id });
        (id, true)
    }

    /// Insert a rule or merge it into the canonical instance
    pub(crate) fn add_rule(
        &mut self,
        lhs: Vec<Term>,
        rhs: Term,
        support: Vec<SupportPair>,
    ) -> (RuleId, bool) {
        if let Some(&id) = self.rule_index.get(&(lhs.clone(), rhs.clone())) {
            self.merge_support(EntityId::Rule(id), support);
            return (id, false);
        }

        let id = RuleId(self.rules.len() as u32);
        let asserted = support.is_empty();
        self.rules.push(Some(Rule {
            lhs: lhs.clone(),
            rhs: rhs.clone(),
            asserted,
            supported_by: support,
            supports_facts: Vec::new(),
            supports_rules: Vec::new(),
        }));
        self.rule_index.insert((lhs, rhs), id);
        self.emit(Verbosity::Trace, KbEvent::RuleAdded { id });
        (id, true)
    }

    /// Merge duplicate-insert bookkeeping into a canonical entity
    fn merge_support(&mut self, entity: EntityId, support: Vec<SupportPair>) {
        if support.is_empty() {
            match entity {
                EntityId::Fact(id) => {
                    if let Some(fact) = self.fact_mut(id) {
                        fact.asserted = true;
                    }
                }
                EntityId::Rule(id) => {
                    if let Some(rule) = self.rule_mut(id) {
                        rule.asserted = true;
                    }
                }
            }
            self.emit(Verbosity::Trace, KbEvent::AssertedFlagSet { entity });
            return;
        }

        let merged = match entity {
            EntityId::Fact(id) => self.fact_mut(id).map(|fact| {
                let mut merged = false;
                for pair in support {
                    if !fact.supported_by.contains(&pair) {
                        fact.supported_by.push(pair);
                        merged = true;
                    }
                }
                merged
            }),
            EntityId::Rule(id) => self.rule_mut(id).map(|rule| {
                let mut merged = false;
                for pair in support {
                    if !rule.supported_by.contains(&pair) {
                        rule.supported_by.push(pair);
                        merged = true;
                    }
                }
                merged
            }),
        };
        if merged == Some(true) {
            self.emit(Verbosity::Trace, KbEvent::SupportMerged { entity });
        }
    }

    /// Run forward chaining to fixpoint from a newly inserted entity
    ///
    /// A new fact resolves against every rule, a new rule against every
    /// fact; genuinely new derived entities join the worklist. Terminates
    /// once no resolution produces an unseen entity, or aborts with
    /// `DerivationLimit` when configured and exceeded.
    fn saturate(&mut self, seed: EntityId) -> Result<(), KbError> {
        let mut queue = VecDeque::from([seed]);
        let mut derivations = 0usize;

        while let Some(item) = queue.pop_front() {
            match item {
                EntityId::Fact(fact_id) => {
                    let rule_ids: Vec<RuleId> = self.rule_index.values().copied().collect();
                    for rule_id in rule_ids {
                        if let Some((derived, new)) = self.fc_infer(fact_id, rule_id) {
                            derivations += 1;
                            self.check_derivation_limit(derivations)?;
                            if new {
                                queue.push_back(derived);
                            }
                        }
                    }
                }
                EntityId::Rule(rule_id) => {
                    let fact_ids: Vec<FactId> = self.fact_index.values().copied().collect();
                    for fact_id in fact_ids {
                        if let Some((derived, new)) = self.fc_infer(fact_id, rule_id) {
                            derivations += 1;
                            self.check_derivation_limit(derivations)?;
                            if new {
                                queue.push_back(derived);
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn check_derivation_limit(&self, derivations: usize) -> Result<(), KbError> {
        if self.config.max_derivations > 0 && derivations > self.config.max_derivations {
            return Err(KbError::DerivationLimit(self.config.max_derivations));
        }
        Ok(())
    }

    // === Retraction ===

    /// Apply the truth-maintenance decision to `root` and cascade
    ///
    /// The root gets the full decision: supported entities survive with the
    /// asserted flag cleared, support-free ones are removed. Cascaded
    /// dependents only ever lose support pairs; one that is still supported
    /// or still asserted stops the cascade with its flag untouched.
    fn retract_entity(&mut self, root: EntityId) -> Result<(), KbError> {
        if self.has_support(root) {
            self.clear_asserted(root);
            return Ok(());
        }

        let mut queue = VecDeque::from([root]);
        let mut removed: HashSet<EntityId> = HashSet::new();

        while let Some(entity) = queue.pop_front() {
            if !self.is_live(entity) {
                continue;
            }

            if entity != root && (self.has_support(entity) || self.is_asserted(entity)) {
                continue;
            }

            // Support-free: withdraw from dependents, then delete
            removed.insert(entity);
            let (dep_facts, dep_rules) = self.take_dependents(entity);
            let dependents = dep_facts
                .into_iter()
                .map(EntityId::Fact)
                .chain(dep_rules.into_iter().map(EntityId::Rule));
            for dependent in dependents {
                if removed.contains(&dependent) {
                    // A removed entity can only reappear as a dependent if
                    // it transitively supported itself
                    return Err(KbError::CyclicSupport(dependent));
                }
                self.strip_support(dependent, entity);
                self.emit(Verbosity::Trace, KbEvent::SupportWithdrawn {
                    from: dependent,
                    antecedent: entity,
                });
                queue.push_back(dependent);
            }
            self.remove_entity(entity);
            self.emit(Verbosity::Trace, KbEvent::Removed { entity });
        }
        Ok(())
    }

    fn is_live(&self, entity: EntityId) -> bool {
        match entity {
            EntityId::Fact(id) => self.fact(id).is_some(),
            EntityId::Rule(id) => self.rule(id).is_some(),
        }
    }

    fn has_support(&self, entity: EntityId) -> bool {
        match entity {
            EntityId::Fact(id) => self.fact(id).is_some_and(|f| !f.supported_by.is_empty()),
            EntityId::Rule(id) => self.rule(id).is_some_and(|r| !r.supported_by.is_empty()),
        }
    }

    fn is_asserted(&self, entity: EntityId) -> bool {
        match entity {
            EntityId::Fact(id) => self.fact(id).is_some_and(|f| f.asserted),
            EntityId::Rule(id) => self.rule(id).is_some_and(|r| r.asserted),
        }
    }

    fn clear_asserted(&mut self, entity: EntityId) {
        match entity {
            EntityId::Fact(id) => {
                if let Some(fact) = self.fact_mut(id) {
                    fact.asserted = false;
                }
            }
            EntityId::Rule(id) => {
                if let Some(rule) = self.rule_mut(id) {
                    rule.asserted = false;
                }
            }
        }
    }

    /// Take ownership of an entity's dependent lists before deletion
    fn take_dependents(&mut self, entity: EntityId) -> (Vec<FactId>, Vec<RuleId>) {
        match entity {
            EntityId::Fact(id) => match self.fact_mut(id) {
                Some(fact) => (
                    std::mem::take(&mut fact.supports_facts),
                    std::mem::take(&mut fact.supports_rules),
                ),
                None => (Vec::new(), Vec::new()),
            },
            EntityId::Rule(id) => match self.rule_mut(id) {
                Some(rule) => (
                    std::mem::take(&mut rule.supports_facts),
                    std::mem::take(&mut rule.supports_rules),
                ),
                None => (Vec::new(), Vec::new()),
            },
        }
    }

    /// Strip every support pair naming `antecedent` from `dependent`
    ///
    /// Back-references stay the exact inverse of `supported_by`: when the
    /// last pair naming some partner disappears, the dependent is also
    /// removed from that partner's dependent list.
    fn strip_support(&mut self, dependent: EntityId, antecedent: EntityId) {
        let (stripped, remaining) = match dependent {
            EntityId::Fact(id) => match self.fact_mut(id) {
                Some(fact) => {
                    let stripped: Vec<SupportPair> = fact
                        .supported_by
                        .iter()
                        .copied()
                        .filter(|pair| pair.names(antecedent))
                        .collect();
                    fact.supported_by.retain(|pair| !pair.names(antecedent));
                    (stripped, fact.supported_by.clone())
                }
                None => return,
            },
            EntityId::Rule(id) => match self.rule_mut(id) {
                Some(rule) => {
                    let stripped: Vec<SupportPair> = rule
                        .supported_by
                        .iter()
                        .copied()
                        .filter(|pair| pair.names(antecedent))
                        .collect();
                    rule.supported_by.retain(|pair| !pair.names(antecedent));
                    (stripped, rule.supported_by.clone())
                }
                None => return,
            },
        };

        for pair in stripped {
            let partner = pair.partner_of(antecedent);
            let still_named = remaining.iter().any(|pair| pair.names(partner));
            if !still_named {
                self.drop_dependent(partner, dependent);
            }
        }
    }

    /// Remove `dependent` from `holder`'s dependent lists
    fn drop_dependent(&mut self, holder: EntityId, dependent: EntityId) {
        match holder {
            EntityId::Fact(id) => {
                if let Some(fact) = self.fact_mut(id) {
                    match dependent {
                        EntityId::Fact(dep) => fact.supports_facts.retain(|&f| f != dep),
                        EntityId::Rule(dep) => fact.supports_rules.retain(|&r| r != dep),
                    }
                }
            }
            EntityId::Rule(id) => {
                if let Some(rule) = self.rule_mut(id) {
                    match dependent {
                        EntityId::Fact(dep) => rule.supports_facts.retain(|&f| f != dep),
                        EntityId::Rule(dep) => rule.supports_rules.retain(|&r| r != dep),
                    }
                }
            }
        }
    }

    /// Delete an entity from arena and index
    fn remove_entity(&mut self, entity: EntityId) {
        match entity {
            EntityId::Fact(id) => {
                if let Some(fact) = self.facts.get_mut(id.0 as usize).and_then(Option::take) {
                    self.fact_index.shift_remove(&fact.statement);
                }
            }
            EntityId::Rule(id) => {
                if let Some(rule) = self.rules.get_mut(id.0 as usize).and_then(Option::take) {
                    self.rule_index.shift_remove(&(rule.lhs, rule.rhs));
                }
            }
        }
    }
}
