//! Belief and trust trackers
//!
//! Both scalars are clamped to `[0, 1]` on every update and keep an
//! append-only history seeded with the initial value.

use super::classifier::{ClassificationRecord, RejectionType};
use super::strategy::Strategy;
use crate::config::EngineConfig;

/// Listener's belief that they should act
#[derive(Debug, Clone)]
pub struct BeliefTracker {
    belief: f64,
    history: Vec<f64>,
    alpha: f64,
    trust_threshold: f64,
}

impl BeliefTracker {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            belief: config.initial_belief,
            history: vec![config.initial_belief],
            alpha: config.alpha,
            trust_threshold: config.trust_threshold,
        }
    }

    /// Apply one utterance. `trust` is the value at the start of the turn.
    /// Returns the delta actually applied before clamping.
    pub fn update(&mut self, record: &ClassificationRecord, trust: f64) -> f64 {
        let effect = if record.is_acceptance {
            (1.0 - self.belief) * 0.9
        } else if record.rejection_type == RejectionType::Explicit {
            -0.9
        } else if record.trust_concern {
            -0.7
        } else if record.rejection_type == RejectionType::Soft {
            -0.45
        } else if record.rejection_type == RejectionType::Ambiguous {
            -0.25
        } else if record.is_curiosity {
            0.25
        } else if record.sentiment_score > 0.3 {
            0.15
        } else {
            0.0
        };

        let mut delta = self.alpha * effect;

        // No belief gains while trust is impaired
        if trust < self.trust_threshold && delta > 0.0 {
            delta = 0.0;
        }

        self.belief = (self.belief + delta).clamp(0.0, 1.0);
        self.history.push(self.belief);
        delta
    }

    pub fn get(&self) -> f64 {
        self.belief
    }

    pub fn history(&self) -> &[f64] {
        &self.history
    }
}

/// Listener's confidence that the agent acts in good faith
#[derive(Debug, Clone)]
pub struct TrustTracker {
    trust: f64,
    history: Vec<f64>,
    recovery_mode: bool,
    beta: f64,
    gamma: f64,
    threshold: f64,
}

impl TrustTracker {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            trust: config.initial_trust,
            history: vec![config.initial_trust],
            recovery_mode: config.initial_trust < config.trust_threshold,
            beta: config.beta,
            gamma: config.gamma,
            threshold: config.trust_threshold,
        }
    }

    /// Erosion rules are checked before recovery rules.
    pub fn update(
        &mut self,
        record: &ClassificationRecord,
        last_strategy: Strategy,
    ) -> (f64, bool) {
        let delta = if record.trust_concern {
            -self.beta * 0.6
        } else if matches!(
            record.rejection_type,
            RejectionType::Soft | RejectionType::Ambiguous
        ) {
            -self.beta * 0.3
        } else if record.rejection_type == RejectionType::Explicit {
            -self.beta * 0.5
        } else if last_strategy == Strategy::Transparency {
            self.gamma
        } else if record.is_curiosity {
            self.gamma * 0.3
        } else {
            0.0
        };

        self.trust = (self.trust + delta).clamp(0.0, 1.0);
        self.history.push(self.trust);
        self.recovery_mode = self.trust < self.threshold;

        (delta, self.recovery_mode)
    }

    pub fn get(&self) -> f64 {
        self.trust
    }

    pub fn recovery_mode(&self) -> bool {
        self.recovery_mode
    }

    pub fn history(&self) -> &[f64] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::classify;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_curiosity_raises_belief() {
        let config = EngineConfig::default();
        let mut belief = BeliefTracker::new(&config);
        let delta = belief.update(&classify("tell me more about your impact"), 0.9);
        assert!(approx(delta, config.alpha * 0.25));
        assert!(approx(belief.get(), config.initial_belief + config.alpha * 0.25));
        assert_eq!(belief.history().len(), 2);
    }

    #[test]
    fn test_trust_gating_blocks_gains() {
        let config = EngineConfig::default();
        let mut belief = BeliefTracker::new(&config);
        let delta = belief.update(&classify("tell me more"), config.trust_threshold - 0.01);
        assert!(approx(delta, 0.0));
        assert!(approx(belief.get(), config.initial_belief));
    }

    #[test]
    fn test_trust_gating_keeps_losses() {
        let config = EngineConfig::default();
        let mut belief = BeliefTracker::new(&config);
        let delta = belief.update(&classify("maybe later"), 0.1);
        assert!(approx(delta, config.alpha * -0.45));
    }

    #[test]
    fn test_acceptance_approaches_one() {
        let config = EngineConfig::default();
        let mut belief = BeliefTracker::new(&config);
        let record = classify("sign me up");
        let first = belief.update(&record, 0.9);
        assert!(approx(first, config.alpha * (1.0 - config.initial_belief) * 0.9));
        for _ in 0..50 {
            belief.update(&record, 0.9);
        }
        assert!(belief.get() < 1.0);
        assert!(belief.get() > 0.99);
    }

    #[test]
    fn test_belief_clamped_at_zero() {
        let config = EngineConfig::default();
        let mut belief = BeliefTracker::new(&config);
        let record = classify("no thanks");
        for _ in 0..5 {
            belief.update(&record, 0.9);
        }
        assert!(approx(belief.get(), 0.0));
    }

    #[test]
    fn test_trust_concern_erodes_before_recovery() {
        let config = EngineConfig::default();
        let mut trust = TrustTracker::new(&config);
        let (delta, recovery) = trust.update(&classify("this is a scam"), Strategy::Transparency);
        assert!(approx(delta, -config.beta * 0.6));
        assert!(!recovery);
    }

    #[test]
    fn test_transparency_recovers_trust() {
        let config = EngineConfig::default();
        let mut trust = TrustTracker::new(&config);
        let (delta, _) = trust.update(&classify("hello"), Strategy::Transparency);
        assert!(approx(delta, config.gamma));
        assert!(approx(trust.get(), 1.0));
    }

    #[test]
    fn test_curiosity_recovers_slowly() {
        let config = EngineConfig::default();
        let mut trust = TrustTracker::new(&config);
        let (delta, _) = trust.update(&classify("tell me more"), Strategy::Impact);
        assert!(approx(delta, config.gamma * 0.3));
    }

    #[test]
    fn test_recovery_mode_tracks_threshold() {
        let config = EngineConfig::default();
        let mut trust = TrustTracker::new(&config);
        let concern = classify("you're being pushy");
        trust.update(&concern, Strategy::Empathy);
        assert!(!trust.recovery_mode());
        let (_, recovery) = trust.update(&concern, Strategy::Empathy);
        assert!(recovery);
        assert!(trust.get() < config.trust_threshold);

        let calm = classify("hello");
        let (_, recovery) = trust.update(&calm, Strategy::Transparency);
        assert!(!recovery);
        assert_eq!(trust.history().len(), 4);
    }
}
