//! Truth-maintenance integration tests: retraction and cascades

use factforge::{
    Constant, Fact, Interner, KnowledgeBase, PredicateSymbol, Rule, SupportPair, Term, Variable,
};

struct Ctx {
    interner: Interner,
}

impl Ctx {
    fn new() -> Self {
        Ctx {
            interner: Interner::new(),
        }
    }

    fn var(&mut self, name: &str) -> Term {
        Term::Variable(Variable::new(self.interner.intern_variable(name)))
    }

    fn const_(&mut self, name: &str) -> Term {
        Term::Constant(Constant::new(self.interner.intern_constant(name)))
    }

    fn pred(&mut self, name: &str, args: Vec<Term>) -> Term {
        let id = self.interner.intern_predicate(name);
        Term::Predicate(PredicateSymbol::new(id, args.len() as u8), args)
    }
}

#[test]
fn test_retract_removes_sole_derivation() {
    let mut ctx = Ctx::new();
    let mut kb = KnowledgeBase::new();

    let a = ctx.const_("a");
    let x = ctx.var("x");
    let pa = ctx.pred("p", vec![a.clone()]);
    let px = ctx.pred("p", vec![x.clone()]);
    let qx = ctx.pred("q", vec![x]);
    let qa = ctx.pred("q", vec![a]);

    kb.assert(Fact::new(pa.clone()).into()).unwrap();
    kb.assert(Rule::new(vec![px.clone()], qx.clone()).into()).unwrap();
    assert!(kb.contains_fact(&qa));

    kb.retract(&Fact::new(pa.clone()).into()).unwrap();

    // p(a) and its sole derivation q(a) are gone; the rule survives
    assert!(!kb.contains_fact(&pa));
    assert!(!kb.contains_fact(&qa));
    assert_eq!(kb.fact_count(), 0);
    assert_eq!(kb.rule_count(), 1);

    // No stale back-reference on the surviving rule
    let rule_id = kb.rule_id(&[px], &qx).unwrap();
    assert!(kb.rule(rule_id).unwrap().supports_facts.is_empty());
}

#[test]
fn test_retract_keeps_independently_supported_derivation() {
    let mut ctx = Ctx::new();
    let mut kb = KnowledgeBase::new();

    let a = ctx.const_("a");
    let x = ctx.var("x");
    let pa = ctx.pred("p", vec![a.clone()]);
    let sa = ctx.pred("s", vec![a.clone()]);
    let px = ctx.pred("p", vec![x.clone()]);
    let sx = ctx.pred("s", vec![x.clone()]);
    let qx = ctx.pred("q", vec![x]);
    let qa = ctx.pred("q", vec![a]);

    kb.assert(Fact::new(pa.clone()).into()).unwrap();
    kb.assert(Fact::new(sa.clone()).into()).unwrap();
    kb.assert(Rule::new(vec![px], qx.clone()).into()).unwrap();
    kb.assert(Rule::new(vec![sx.clone()], qx.clone()).into()).unwrap();

    let qa_id = kb.fact_id(&qa).unwrap();
    assert_eq!(kb.fact(qa_id).unwrap().supported_by.len(), 2);

    kb.retract(&Fact::new(pa).into()).unwrap();

    // q(a) survives on its remaining support route only
    let sa_id = kb.fact_id(&sa).unwrap();
    let s_rule_id = kb.rule_id(&[sx], &qx).unwrap();
    let qa_fact = kb.fact(qa_id).unwrap();
    assert_eq!(qa_fact.supported_by, vec![SupportPair::new(sa_id, s_rule_id)]);
    assert!(!qa_fact.asserted);
}

#[test]
fn test_retract_asserted_and_supported_clears_flag_only() {
    let mut ctx = Ctx::new();
    let mut kb = KnowledgeBase::new();

    let a = ctx.const_("a");
    let x = ctx.var("x");
    let pa = ctx.pred("p", vec![a.clone()]);
    let px = ctx.pred("p", vec![x.clone()]);
    let qx = ctx.pred("q", vec![x]);
    let qa = ctx.pred("q", vec![a]);

    kb.assert(Fact::new(pa).into()).unwrap();
    kb.assert(Rule::new(vec![px], qx).into()).unwrap();
    // q(a) is derived; now also asserted externally
    kb.assert(Fact::new(qa.clone()).into()).unwrap();
    let qa_id = kb.fact_id(&qa).unwrap();
    assert!(kb.fact(qa_id).unwrap().asserted);

    kb.retract(&Fact::new(qa.clone()).into()).unwrap();

    // Still justified by its support, only the flag changed
    let qa_fact = kb.fact(qa_id).unwrap();
    assert!(!qa_fact.asserted);
    assert_eq!(qa_fact.supported_by.len(), 1);
    assert!(kb.contains_fact(&qa));
}

#[test]
fn test_asserted_dependent_survives_cascade() {
    let mut ctx = Ctx::new();
    let mut kb = KnowledgeBase::new();

    let a = ctx.const_("a");
    let x = ctx.var("x");
    let pa = ctx.pred("p", vec![a.clone()]);
    let px = ctx.pred("p", vec![x.clone()]);
    let qx = ctx.pred("q", vec![x]);
    let qa = ctx.pred("q", vec![a]);

    kb.assert(Fact::new(pa.clone()).into()).unwrap();
    kb.assert(Rule::new(vec![px], qx).into()).unwrap();
    // q(a) is derived, then also asserted externally
    kb.assert(Fact::new(qa.clone()).into()).unwrap();

    kb.retract(&Fact::new(pa.clone()).into()).unwrap();

    // q(a) loses its only support pair but stays asserted, so the cascade
    // stops there; only the direct target is removed
    assert!(!kb.contains_fact(&pa));
    let qa_fact = kb.fact(kb.fact_id(&qa).expect("asserted q(a) must survive")).unwrap();
    assert!(qa_fact.asserted);
    assert!(qa_fact.supported_by.is_empty());
    assert_eq!(kb.fact_count(), 1);
}

#[test]
fn test_cascade_leaves_supported_dependent_flag_alone() {
    let mut ctx = Ctx::new();
    let mut kb = KnowledgeBase::new();

    let a = ctx.const_("a");
    let x = ctx.var("x");
    let pa = ctx.pred("p", vec![a.clone()]);
    let sa = ctx.pred("s", vec![a.clone()]);
    let px = ctx.pred("p", vec![x.clone()]);
    let sx = ctx.pred("s", vec![x.clone()]);
    let qx = ctx.pred("q", vec![x]);
    let qa = ctx.pred("q", vec![a]);

    kb.assert(Fact::new(pa.clone()).into()).unwrap();
    kb.assert(Fact::new(sa).into()).unwrap();
    kb.assert(Rule::new(vec![px], qx.clone()).into()).unwrap();
    kb.assert(Rule::new(vec![sx], qx).into()).unwrap();
    // q(a) holds two support pairs and the asserted flag
    kb.assert(Fact::new(qa.clone()).into()).unwrap();

    kb.retract(&Fact::new(pa).into()).unwrap();

    // A cascaded dependent only loses support pairs; its flag is not the
    // cascade's to change
    let qa_fact = kb.fact(kb.fact_id(&qa).unwrap()).unwrap();
    assert!(qa_fact.asserted);
    assert_eq!(qa_fact.supported_by.len(), 1);
}

#[test]
fn test_retract_supported_unasserted_is_noop() {
    let mut ctx = Ctx::new();
    let mut kb = KnowledgeBase::new();

    let a = ctx.const_("a");
    let x = ctx.var("x");
    let pa = ctx.pred("p", vec![a.clone()]);
    let px = ctx.pred("p", vec![x.clone()]);
    let qx = ctx.pred("q", vec![x]);
    let qa = ctx.pred("q", vec![a]);

    kb.assert(Fact::new(pa).into()).unwrap();
    kb.assert(Rule::new(vec![px], qx).into()).unwrap();

    // q(a) is derived-only: retracting it changes nothing
    kb.retract(&Fact::new(qa.clone()).into()).unwrap();
    assert!(kb.contains_fact(&qa));
    assert_eq!(kb.fact_count(), 2);
}

#[test]
fn test_retract_cascades_through_residual_rule() {
    let mut ctx = Ctx::new();
    let mut kb = KnowledgeBase::new();

    let a = ctx.const_("a");
    let b = ctx.const_("b");
    let x = ctx.var("x");
    let y = ctx.var("y");
    let pa = ctx.pred("p", vec![a.clone()]);
    let sab = ctx.pred("s", vec![a.clone(), b.clone()]);
    let px = ctx.pred("p", vec![x.clone()]);
    let sxy = ctx.pred("s", vec![x, y.clone()]);
    let qy = ctx.pred("q", vec![y.clone()]);
    let qb = ctx.pred("q", vec![b]);

    kb.assert(Rule::new(vec![px, sxy], qy.clone()).into()).unwrap();
    kb.assert(Fact::new(pa.clone()).into()).unwrap();
    kb.assert(Fact::new(sab.clone()).into()).unwrap();

    let say = ctx.pred("s", vec![a, y]);
    assert!(kb.rule_id(&[say.clone()], &qy).is_some());
    assert!(kb.contains_fact(&qb));

    kb.retract(&Fact::new(pa).into()).unwrap();

    // The residual rule and q(b) both lose their justification
    assert!(kb.rule_id(&[say], &qy).is_none());
    assert!(!kb.contains_fact(&qb));
    assert!(kb.contains_fact(&sab));
    assert_eq!(kb.fact_count(), 1);
    assert_eq!(kb.rule_count(), 1);

    // s(a,b) no longer back-references the removed q(b)
    let sab_fact = kb.fact(kb.fact_id(&sab).unwrap()).unwrap();
    assert!(sab_fact.supports_facts.is_empty());
}

#[test]
fn test_rederivation_after_retract() {
    let mut ctx = Ctx::new();
    let mut kb = KnowledgeBase::new();

    let a = ctx.const_("a");
    let x = ctx.var("x");
    let pa = ctx.pred("p", vec![a.clone()]);
    let px = ctx.pred("p", vec![x.clone()]);
    let qx = ctx.pred("q", vec![x]);
    let qa = ctx.pred("q", vec![a]);

    kb.assert(Fact::new(pa.clone()).into()).unwrap();
    kb.assert(Rule::new(vec![px], qx).into()).unwrap();
    kb.retract(&Fact::new(pa.clone()).into()).unwrap();
    assert!(!kb.contains_fact(&qa));

    // Asserting p(a) again re-derives q(a)
    kb.assert(Fact::new(pa).into()).unwrap();
    assert!(kb.contains_fact(&qa));
}

#[test]
fn test_diamond_cascade_removes_each_entity_once() {
    // p(a) supports q(a) and r(a) through two rules; both support t(a)
    // through two more. Retracting p(a) empties the fact store.
    let mut ctx = Ctx::new();
    let mut kb = KnowledgeBase::new();

    let a = ctx.const_("a");
    let x = ctx.var("x");
    let pa = ctx.pred("p", vec![a]);
    let px = ctx.pred("p", vec![x.clone()]);
    let qx = ctx.pred("q", vec![x.clone()]);
    let rx = ctx.pred("r", vec![x.clone()]);
    let tx = ctx.pred("t", vec![x]);

    kb.assert(Rule::new(vec![px.clone()], qx.clone()).into()).unwrap();
    kb.assert(Rule::new(vec![px], rx.clone()).into()).unwrap();
    kb.assert(Rule::new(vec![qx], tx.clone()).into()).unwrap();
    kb.assert(Rule::new(vec![rx], tx).into()).unwrap();
    kb.assert(Fact::new(pa.clone()).into()).unwrap();

    // q(a), r(a), t(a) all derived; t(a) carries two support pairs
    assert_eq!(kb.fact_count(), 4);

    kb.retract(&Fact::new(pa).into()).unwrap();

    assert_eq!(kb.fact_count(), 0);
    assert_eq!(kb.rule_count(), 4);
    for (_, rule) in kb.rules() {
        assert!(rule.supports_facts.is_empty());
        assert!(rule.supports_rules.is_empty());
    }
}

#[test]
fn test_retract_then_reassert_flag_cycle() {
    let mut ctx = Ctx::new();
    let mut kb = KnowledgeBase::new();

    let a = ctx.const_("a");
    let pa = ctx.pred("p", vec![a]);

    kb.assert(Fact::new(pa.clone()).into()).unwrap();
    kb.retract(&Fact::new(pa.clone()).into()).unwrap();
    assert!(!kb.contains_fact(&pa));

    kb.assert(Fact::new(pa.clone()).into()).unwrap();
    assert!(kb.fact(kb.fact_id(&pa).unwrap()).unwrap().asserted);
}
