//! Reference scenarios across crate boundaries.

use proofgate::chain::{verify_entries, ChainFault, HashChain};
use proofgate::proof::{CausalLink, ProofDraft, ProofReducer, ProofVerifier, ReductionConfig};
use proofgate::simulation::{
    CausalSimulator, InevitabilityDetector, PathOrigin, ProofType, SimulationConfig,
};
use proofgate::{ContentHash, FinalDecision, Intervention, InvariantCategory, Phase, StateSnapshot};

fn dead_state() -> StateSnapshot {
    StateSnapshot {
        entropy: 0.9,
        survival_ratio: 0.2,
        dead_elements: 4,
        singularities: 1,
        total_elements: 10,
    }
}

#[test]
fn every_path_dead_is_all_paths_collapse() {
    let simulator = CausalSimulator::new(SimulationConfig { depth: 4 }).unwrap();
    let paths = simulator
        .simulate(
            &dead_state(),
            &[Intervention::new("a", 0), Intervention::new("b", 0)],
        )
        .unwrap();
    assert_eq!(paths.len(), 3);
    assert!(paths.iter().all(|p| p.terminal_phase == Phase::Dead));

    let proof = InevitabilityDetector::new().classify(&paths);
    assert_eq!(proof.proof_type, ProofType::AllPathsCollapse);
    assert_eq!(proof.collapsing_paths, 3);
    assert_eq!(proof.confidence, Some(1.0));

    let fastest = proof.fastest_collapse.unwrap();
    assert_eq!(fastest.steps_to_collapse, 0);
    assert_eq!(fastest.origin, PathOrigin::Intervention("a".into()));
}

#[test]
fn no_interventions_yields_only_the_baseline() {
    let paths = CausalSimulator::default()
        .simulate(&dead_state(), &[])
        .unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].origin, PathOrigin::NoAction);
    assert_eq!(paths[0].steps(), SimulationConfig::DEFAULT_DEPTH);
}

#[test]
fn oversized_proof_is_reduced() {
    let description = format!(
        "The intent layer detected that the action was very clearly drifting {}",
        "away from the stated goal of the current run ".repeat(2)
    );
    assert!(description.chars().count() >= 140);

    let proof = ProofDraft {
        run_id: "run-big".into(),
        action_fingerprint: ContentHash::hash(b"delete branch"),
        final_decision: FinalDecision::Block,
        primary_invariant: InvariantCategory::IntentDrift,
        causal_chain: vec![
            CausalLink::new(1, "intent", "INTENT_DRIFT detected", "goal mismatch"),
            CausalLink::new(2, "intent", "INTENT_DRIFT detected", "goal mismatch again"),
            CausalLink::new(3, "necessity", "necessity scored", "0.4"),
            CausalLink::new(4, "simulation", "simulation result", "NOT_INEVITABLE"),
            CausalLink::new(5, "gate", "gate decision", "BLOCK"),
        ],
        forbidden_alternatives: Vec::new(),
        description,
        entropy_snapshot: None,
        contract_snapshot: None,
    }
    .seal();
    let verifier = ProofVerifier::default();
    assert!(verifier.verify(&proof).valid);

    let reducer = ProofReducer::new(ReductionConfig::default()).unwrap();
    assert!(reducer.needs_reduction(&proof));
    let reduced = reducer.reduce(&proof);

    let pairs: Vec<(&str, &str)> = reduced
        .causal_chain()
        .iter()
        .map(|l| (l.layer.as_str(), l.event.as_str()))
        .collect();
    assert_eq!(
        pairs,
        [
            ("intent", "INTENT_DRIFT detected"),
            ("simulation", "simulation result"),
            ("gate", "gate decision"),
        ]
    );
    assert_eq!(reduced.causal_chain()[0].effect, "goal mismatch");

    assert!(reduced.causal_chain().len() <= 3);
    assert!(reduced.description().chars().count() <= 100);
    assert!(reduced.description().ends_with("..."));
    assert_ne!(reduced.hash(), proof.hash());
    assert!(reduced.is_reduced());
    assert!(verifier.verify(&reduced).valid);

    let steps: Vec<u32> = reduced.causal_chain().iter().map(|l| l.step).collect();
    assert_eq!(steps, (1..=steps.len() as u32).collect::<Vec<_>>());
    assert_eq!(reduced.causal_chain().last().unwrap().event, "gate decision");
}

#[test]
fn corrupted_link_is_reported_at_its_index() {
    let mut chain = HashChain::new();
    for payload in [b"one".as_slice(), b"two", b"three", b"four"] {
        chain.append(ContentHash::hash(payload)).unwrap();
    }
    assert!(chain.verify().chain_intact);

    let mut entries = chain.entries().to_vec();
    entries[1].previous_hash = Some(ContentHash::hash(b"forged"));

    let report = verify_entries(&entries);
    assert!(!report.chain_intact);
    assert_eq!(report.failing_indices(), vec![1]);
    assert!(report
        .issues_at(1)
        .any(|issue| matches!(issue.fault, ChainFault::BrokenLink { .. })));
    assert!(report
        .issues_at(1)
        .any(|issue| matches!(issue.fault, ChainFault::HashMismatch { .. })));
}

#[test]
fn every_broken_index_is_reported() {
    let mut chain = HashChain::new();
    for i in 0u8..6 {
        chain.append(ContentHash::hash(&[i])).unwrap();
    }
    let mut entries = chain.entries().to_vec();
    entries[2].payload_hash = ContentHash::hash(b"swapped");
    entries[4].entry_hash = ContentHash::zero();

    let report = verify_entries(&entries);
    assert!(!report.chain_intact);
    let failing = report.failing_indices();
    assert!(failing.contains(&2));
    assert!(failing.contains(&4));
    // Entry 5 still names the original hash of entry 4.
    assert!(failing.contains(&5));
}
