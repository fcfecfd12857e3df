use proofgate::authority::{AuthorityRegistry, RefutationRequest, RefutationValidator};
use proofgate::proof::{
    GateSignal, LayerReport, ProofAssembler, ProofReducer, ProofVerifier, ReductionConfig,
};
use proofgate::{AuthorityClass, FinalDecision, InvariantCategory};
use proptest::prelude::*;

fn any_layer() -> impl Strategy<Value = LayerReport> {
    let reasons = prop::sample::select(vec![
        "ok",
        "budget exhausted",
        "entropy collapse imminent",
        "irreversible write",
        "intent drift from goal",
        "action not necessary",
        "survival ratio too low",
        "entropy above threshold",
        "unexpected",
    ]);
    let signal = prop::option::of(prop::sample::select(vec![
        GateSignal::ReadOnly,
        GateSignal::Permanent,
    ]));
    (0u8..4, any::<bool>(), reasons, signal).prop_map(|(kind, passed, reason, signal)| {
        let layer = match kind {
            0 => LayerReport::entropy(passed, reason, None),
            1 => LayerReport::intent(passed, reason),
            2 => LayerReport::necessity(passed, reason),
            _ => LayerReport::external("policy", passed, reason),
        };
        match signal {
            Some(signal) => layer.with_gate_signal(signal),
            None => layer,
        }
    })
}

fn any_class() -> impl Strategy<Value = AuthorityClass> {
    prop::sample::select(AuthorityClass::ALL.to_vec())
}

fn any_category() -> impl Strategy<Value = InvariantCategory> {
    prop::sample::select(InvariantCategory::VIOLATIONS.to_vec())
}

proptest! {
    #[test]
    fn identical_inputs_seal_identical_hashes(
        layers in prop::collection::vec(any_layer(), 0..6),
        action in prop::collection::vec(any::<u8>(), 0..32),
    ) {
        let assembler = ProofAssembler::new();
        let a = assembler.assemble("run-p", &action, &layers).unwrap();
        let b = assembler.assemble("run-p", &action, &layers).unwrap();
        prop_assert_eq!(a.hash(), b.hash());
        prop_assert_eq!(a.canonical_bytes(), b.canonical_bytes());
    }

    #[test]
    fn assembled_proofs_are_consistent(layers in prop::collection::vec(any_layer(), 0..6)) {
        let proof = ProofAssembler::new().assemble("run-c", b"act", &layers).unwrap();
        let report = ProofVerifier::default().verify(&proof);
        prop_assert!(report.valid, "{}", report.summary());

        let any_failed = layers.iter().any(LayerReport::failed);
        prop_assert_eq!(proof.final_decision() == FinalDecision::Allow, !any_failed);
        if proof.final_decision() == FinalDecision::PermanentReadOnly {
            prop_assert!(proof.primary_invariant().permits_permanent_read_only());
        }
    }

    #[test]
    fn reduction_is_idempotent(layers in prop::collection::vec(any_layer(), 0..6)) {
        let reducer = ProofReducer::new(ReductionConfig::default()).unwrap();
        let proof = ProofAssembler::new().assemble("run-i", b"act", &layers).unwrap();
        let once = reducer.reduce(&proof);
        let twice = reducer.reduce(&once);
        prop_assert_eq!(once.hash(), twice.hash());
        prop_assert!(ProofVerifier::default().verify(&once).valid);
    }

    #[test]
    fn higher_authority_keeps_refutation_rights(
        refuter in any_class(),
        refuted in any_class(),
        invariant in any_category(),
    ) {
        let registry = AuthorityRegistry::bootstrap();
        let validator = RefutationValidator::new(&registry);
        let decision = validator.validate(&RefutationRequest::new(refuter, refuted, invariant));
        if decision.authorized {
            for stronger in AuthorityClass::ALL.into_iter().filter(|c| *c >= refuter) {
                let upgraded = validator
                    .validate(&RefutationRequest::new(stronger, refuted, invariant));
                prop_assert!(upgraded.authorized, "{stronger} lost a right {refuter} had");
            }
        }
    }

    #[test]
    fn supreme_invariants_are_never_refuted(
        refuter in any_class(),
        refuted in any_class(),
    ) {
        let registry = AuthorityRegistry::bootstrap();
        let validator = RefutationValidator::new(&registry);
        for invariant in [InvariantCategory::BudgetExhausted, InvariantCategory::InevitableCollapse] {
            let decision = validator.validate(&RefutationRequest::new(refuter, refuted, invariant));
            prop_assert!(!decision.authorized);
            prop_assert!(decision.hard_abort);
        }
    }
}
