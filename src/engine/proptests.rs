//! Property-based tests for the decision loop
//!
//! - Belief and trust stay in `[0, 1]`
//! - Weights sum to 1 and never drop below the floor
//! - Low trust never lets belief rise
//! - Acceptance phrases dominate whatever surrounds them
//! - Strongly negative soft declines escalate to explicit refusals
//! - Terminated sessions are absorbing

use super::testing::SequenceSource;
use super::Strategy as Tactic;
use super::{
    classify, BeliefTracker, ClassificationRecord, Orchestrator, RejectionType, StrategyAdapter,
    TrustTracker, TurnResult, Variant,
};
use crate::config::EngineConfig;
use crate::generation::testing::{sample_context, MockGenerator};
use proptest::prelude::*;

const UTTERANCES: &[&str] = &[
    "tell me more about your impact",
    "how does it work?",
    "maybe later",
    "not right now",
    "I can't afford it",
    "no thanks",
    "not interested",
    "this feels like a scam",
    "you're being pushy",
    "okay thanks",
    "that sounds wonderful",
    "this is awful",
    "hmm",
    "I'll donate",
];

fn arb_utterance() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => proptest::sample::select(UTTERANCES).prop_map(str::to_string),
        1 => "[a-zA-Z ,.!?']{0,60}",
    ]
}

fn arb_record() -> impl Strategy<Value = ClassificationRecord> {
    arb_utterance().prop_map(|text| classify(&text))
}

fn arb_variant() -> impl Strategy<Value = Variant> {
    prop_oneof![
        Just(Variant::Static),
        Just(Variant::AdaptiveNoTrust),
        Just(Variant::AdaptiveWithTrust),
    ]
}

fn in_unit(x: f64) -> bool {
    (0.0..=1.0).contains(&x)
}

proptest! {
    #[test]
    fn classify_is_total(text in ".{0,200}") {
        let record = classify(&text);
        prop_assert!((-1.0..=1.0).contains(&record.sentiment_score));
        prop_assert!(in_unit(record.rejection_confidence));
        if record.is_acceptance {
            prop_assert_eq!(record.rejection_type, RejectionType::None);
        }
    }

    #[test]
    fn acceptance_dominates(prefix in "[a-z ,.]{0,30}", suffix in "[a-z ,.]{0,30}") {
        let record = classify(&format!("{prefix} no thanks, sign me up {suffix}"));
        prop_assert!(record.is_acceptance);
        prop_assert_eq!(record.rejection_type, RejectionType::None);
        prop_assert!(!record.trust_concern);
    }

    #[test]
    fn negative_soft_decline_escalates(
        decline in proptest::sample::select(vec!["maybe later", "not right now"]),
        insult in proptest::sample::select(vec!["awful", "terrible", "horrible"]),
    ) {
        let record = classify(&format!("{decline}, this is {insult} and {insult}"));
        prop_assert_eq!(record.rejection_type, RejectionType::Explicit);
    }

    #[test]
    fn trackers_stay_bounded(records in proptest::collection::vec(arb_record(), 1..40)) {
        let config = EngineConfig::default();
        let mut belief = BeliefTracker::new(&config);
        let mut trust = TrustTracker::new(&config);
        for (i, record) in records.iter().enumerate() {
            let strategy = Tactic::ALL[i % Tactic::ALL.len()];
            belief.update(record, trust.get());
            trust.update(record, strategy);
            prop_assert!(in_unit(belief.get()));
            prop_assert!(in_unit(trust.get()));
            prop_assert_eq!(trust.recovery_mode(), trust.get() < config.trust_threshold);
        }
        prop_assert_eq!(belief.history().len(), records.len() + 1);
    }

    #[test]
    fn low_trust_blocks_belief_gains(record in arb_record(), trust in 0.0f64..0.5) {
        let mut belief = BeliefTracker::new(&EngineConfig::default());
        let before = belief.get();
        let delta = belief.update(&record, trust);
        prop_assert!(delta <= 0.0);
        prop_assert!(belief.get() <= before);
    }

    #[test]
    fn weights_normalized_above_floor(
        steps in proptest::collection::vec((0..Tactic::ALL.len(), arb_record(), any::<bool>()), 1..60),
    ) {
        let config = EngineConfig::default();
        let mut adapter = StrategyAdapter::new(&config);
        for (idx, record, recovery) in &steps {
            adapter.adapt(Tactic::ALL[*idx], record, *recovery);
            let sum: f64 = adapter.weights().values().sum();
            prop_assert!((sum - 1.0).abs() < 1e-9);
            for weight in adapter.weights().values() {
                prop_assert!(*weight >= config.min_strategy_weight - 1e-9);
            }
        }
    }

    #[test]
    fn sessions_stay_consistent(
        variant in arb_variant(),
        script in proptest::collection::vec(arb_utterance(), 1..20),
        draws in proptest::collection::vec(0.0f64..1.0, 1..8),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(async {
            let config = EngineConfig::default();
            let gen = MockGenerator::new();
            let mut orch = Orchestrator::new(
                &config,
                variant,
                sample_context(),
                Box::new(SequenceSource::new(draws)),
            );
            orch.start();

            let mut closed: Option<TurnResult> = None;
            for text in &script {
                let result = orch.process(text, &gen).await;
                if let Some(first) = &closed {
                    prop_assert!(result.stop);
                    prop_assert_eq!(&result.agent_msg, &first.agent_msg);
                    prop_assert_eq!(&result.metrics, &first.metrics);
                    continue;
                }
                prop_assert!(in_unit(result.metrics.belief));
                prop_assert!(in_unit(result.metrics.trust));
                prop_assert!(result.metrics.turn <= config.max_turns);
                if !variant.updates_trust() {
                    prop_assert!((result.metrics.trust - config.initial_trust).abs() < 1e-9);
                }
                if result.stop {
                    prop_assert!(result.reason.is_some());
                    prop_assert!(!orch.is_active());
                    closed = Some(result);
                }
            }

            for request in gen.recorded_requests() {
                if variant == Variant::Static {
                    prop_assert_eq!(request.strategy, Tactic::Empathy);
                }
                if variant.restricts_in_recovery() && request.recovery {
                    prop_assert!(Tactic::RECOVERY_ALLOWED.contains(&request.strategy));
                }
            }
            Ok(())
        })?;
    }
}
