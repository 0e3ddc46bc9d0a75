//! The forward-chaining resolution step
//!
//! One fact is resolved against only the first antecedent of one rule. A
//! single-antecedent rule resolves completely into a new fact; a longer rule
//! yields a residual rule over its remaining, instantiated antecedents. Full
//! simultaneous unification of all antecedents is deliberately not performed:
//! a fact matching a later antecedent fires nothing until earlier resolutions
//! have consumed everything before it.

use super::entity::{EntityId, FactId, RuleId, SupportPair};
use super::store::KnowledgeBase;
use crate::config::Verbosity;
use crate::event::KbEvent;
use crate::logic::Term;
use crate::unification::match_pattern;

impl KnowledgeBase {
    /// Attempt one resolution of `fact_id` against `rule_id`
    ///
    /// Returns the canonical handle of the resolvent and whether it was new
    /// to storage, or `None` when the fact does not match the rule's first
    /// antecedent. Back-references are registered on both antecedents either
    /// way, so every support route is recorded.
    pub(crate) fn fc_infer(
        &mut self,
        fact_id: FactId,
        rule_id: RuleId,
    ) -> Option<(EntityId, bool)> {
        let (statement, first, rest, rhs) = {
            let fact = self.fact(fact_id)?;
            let rule = self.rule(rule_id)?;
            let first = rule.lhs.first()?.clone();
            (
                fact.statement.clone(),
                first,
                rule.lhs[1..].to_vec(),
                rule.rhs.clone(),
            )
        };

        let bindings = match_pattern(&statement, &first).ok()?;
        let head = rhs.instantiate(&bindings);
        let support = SupportPair::new(fact_id, rule_id);

        let (derived, new) = if rest.is_empty() {
            // Fully resolved: the consequent becomes a fact
            let (id, new) = self.add_fact(head, vec![support]);
            (EntityId::Fact(id), new)
        } else {
            // Residual rule over the remaining antecedents
            let new_lhs: Vec<Term> = rest.iter().map(|t| t.instantiate(&bindings)).collect();
            let (id, new) = self.add_rule(new_lhs, head, vec![support]);
            (EntityId::Rule(id), new)
        };

        self.register_support(fact_id, rule_id, derived);
        self.emit(Verbosity::Trace, KbEvent::Derived {
            fact: fact_id,
            rule: rule_id,
            result: derived,
        });
        Some((derived, new))
    }

    /// Record `derived` in the dependent lists of both antecedents
    ///
    /// Keeps back-references the exact inverse of `supported_by` without
    /// duplicating entries when the same pair is re-derived.
    fn register_support(&mut self, fact_id: FactId, rule_id: RuleId, derived: EntityId) {
        match derived {
            EntityId::Fact(id) => {
                if let Some(fact) = self.fact_mut(fact_id) {
                    if !fact.supports_facts.contains(&id) {
                        fact.supports_facts.push(id);
                    }
                }
                if let Some(rule) = self.rule_mut(rule_id) {
                    if !rule.supports_facts.contains(&id) {
                        rule.supports_facts.push(id);
                    }
                }
            }
            EntityId::Rule(id) => {
                if let Some(fact) = self.fact_mut(fact_id) {
                    if !fact.supports_rules.contains(&id) {
                        fact.supports_rules.push(id);
                    }
                }
                if let Some(rule) = self.rule_mut(rule_id) {
                    if !rule.supports_rules.contains(&id) {
                        rule.supports_rules.push(id);
                    }
                }
            }
        }
    }
}
