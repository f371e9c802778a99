//! Strategy selection and weight adaptation

use super::classifier::{ClassificationRecord, RejectionType};
use crate::config::EngineConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A named persuasion approach
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Strategy {
    Empathy,
    Impact,
    SocialProof,
    Transparency,
    EthicalUrgency,
}

impl Strategy {
    pub const COUNT: u8 = 5;

    pub const ALL: [Strategy; Self::COUNT as usize] = [
        Strategy::Empathy,
        Strategy::Impact,
        Strategy::SocialProof,
        Strategy::Transparency,
        Strategy::EthicalUrgency,
    ];

    /// Rapport-repair and disclosure strategies, the only ones eligible
    /// while trust is impaired
    pub const RECOVERY_ALLOWED: [Strategy; 2] = [Strategy::Empathy, Strategy::Transparency];

    /// Used when no strategy is eligible
    pub const DEFAULT: Strategy = Strategy::Empathy;

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Empathy => "Empathy",
            Strategy::Impact => "Impact",
            Strategy::SocialProof => "SocialProof",
            Strategy::Transparency => "Transparency",
            Strategy::EthicalUrgency => "EthicalUrgency",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source of uniform draws in `[0, 1)` for strategy sampling
pub trait RandomSource: Send {
    fn next_unit(&mut self) -> f64;
}

impl RandomSource for rand::rngs::StdRng {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Per-strategy selection weights
#[derive(Debug, Clone)]
pub struct StrategyAdapter {
    weights: BTreeMap<Strategy, f64>,
    history: BTreeMap<Strategy, Vec<f64>>,
    counts: BTreeMap<Strategy, u32>,
    floor: f64,
    hard_penalty: f64,
    soft_penalty: f64,
}

impl StrategyAdapter {
    pub fn new(config: &EngineConfig) -> Self {
        let uniform = 1.0 / f64::from(Strategy::COUNT);
        Self {
            weights: Strategy::ALL.iter().map(|s| (*s, uniform)).collect(),
            history: Strategy::ALL.iter().map(|s| (*s, vec![uniform])).collect(),
            counts: Strategy::ALL.iter().map(|s| (*s, 0)).collect(),
            floor: config.min_strategy_weight,
            hard_penalty: config.hard_rejection_penalty,
            soft_penalty: config.soft_rejection_penalty,
        }
    }

    /// Sample the next strategy. In recovery only rapport-repair
    /// strategies are eligible; excluded weights are left untouched.
    pub fn select(&mut self, in_recovery: bool, rng: &mut dyn RandomSource) -> Strategy {
        let eligible: &[Strategy] = if in_recovery {
            &Strategy::RECOVERY_ALLOWED
        } else {
            &Strategy::ALL
        };
        let chosen = self.sample(eligible, rng.next_unit());
        *self.counts.entry(chosen).or_insert(0) += 1;
        chosen
    }

    fn sample(&self, eligible: &[Strategy], draw: f64) -> Strategy {
        let Some(last) = eligible.last() else {
            return Strategy::DEFAULT;
        };

        let raw: Vec<f64> = eligible
            .iter()
            .map(|s| self.weights.get(s).copied().unwrap_or(0.0))
            .collect();
        let total: f64 = raw.iter().sum();

        #[allow(clippy::cast_precision_loss)] // at most five strategies
        let probs: Vec<f64> = if total <= 0.0 {
            vec![1.0 / eligible.len() as f64; eligible.len()]
        } else {
            raw.iter().map(|w| w / total).collect()
        };

        let mut cumulative = 0.0;
        for (strategy, p) in eligible.iter().zip(probs) {
            cumulative += p;
            if draw < cumulative {
                return *strategy;
            }
        }
        *last
    }

    /// Adapt the weight of the strategy used, given the reaction it got.
    ///
    /// In recovery only the recovery-eligible weights move: they are
    /// renormalized within the mass they already hold, and excluded
    /// weights keep their exact values.
    pub fn adapt(&mut self, used: Strategy, record: &ClassificationRecord, in_recovery: bool) {
        let floor = self.floor;
        let scope: &[Strategy] = if in_recovery {
            &Strategy::RECOVERY_ALLOWED
        } else {
            &Strategy::ALL
        };
        let mass: f64 = if in_recovery {
            scope
                .iter()
                .map(|s| self.weights.get(s).copied().unwrap_or(floor))
                .sum()
        } else {
            1.0
        };

        if scope.contains(&used) {
            let weight = self.weights.entry(used).or_insert(floor);
            if record.is_acceptance {
                *weight = (*weight * 1.5).min(1.0);
            } else if record.is_curiosity {
                *weight = (*weight * 1.2).min(1.0);
            } else if record.rejection_type == RejectionType::Explicit {
                *weight = (*weight * (1.0 - self.hard_penalty)).max(floor);
            } else if record.rejection_type == RejectionType::Soft {
                *weight = (*weight * (1.0 - self.soft_penalty)).max(floor);
            }
            if record.trust_concern {
                *weight = (*weight * 0.7).max(floor);
            }
        }

        // Trust concerns always favour disclosure next turn
        if record.trust_concern {
            let transparency = self.weights.entry(Strategy::Transparency).or_insert(floor);
            *transparency = (*transparency * 1.3).min(1.0);
        }

        renormalize(&mut self.weights, scope, mass, floor);

        for (strategy, weight) in &self.weights {
            self.history.entry(*strategy).or_default().push(*weight);
        }

        tracing::debug!(strategy = %used, weights = ?self.weights, "Adapted strategy weights");
    }

    pub fn weights(&self) -> &BTreeMap<Strategy, f64> {
        &self.weights
    }

    pub fn history(&self) -> &BTreeMap<Strategy, Vec<f64>> {
        &self.history
    }

    pub fn counts(&self) -> &BTreeMap<Strategy, u32> {
        &self.counts
    }
}

/// Scale the weights in `scope` to sum `mass` with each at least `floor`.
/// Weights lifted to the floor take their mass proportionally from the
/// others. Weights outside `scope` are not touched. Requires
/// `floor * scope.len() <= mass`.
#[allow(clippy::cast_precision_loss)] // at most five strategies
fn renormalize(weights: &mut BTreeMap<Strategy, f64>, scope: &[Strategy], mass: f64, floor: f64) {
    if scope.is_empty() {
        return;
    }
    let in_scope = |s: &Strategy| scope.contains(s);

    let total: f64 = weights
        .iter()
        .filter(|(s, _)| in_scope(s))
        .map(|(_, w)| *w)
        .sum();
    if total <= 0.0 {
        let share = mass / scope.len() as f64;
        for strategy in scope {
            weights.insert(*strategy, share);
        }
        return;
    }
    for (strategy, weight) in weights.iter_mut() {
        if in_scope(strategy) {
            *weight = *weight / total * mass;
        }
    }

    let mut pinned: BTreeSet<Strategy> = BTreeSet::new();
    loop {
        let under: Vec<Strategy> = weights
            .iter()
            .filter(|(s, w)| in_scope(s) && !pinned.contains(*s) && **w < floor)
            .map(|(s, _)| *s)
            .collect();
        if under.is_empty() {
            break;
        }
        pinned.extend(under);

        let free_mass = mass - floor * pinned.len() as f64;
        let free_total: f64 = weights
            .iter()
            .filter(|(s, _)| in_scope(s) && !pinned.contains(*s))
            .map(|(_, w)| *w)
            .sum();

        for (strategy, weight) in weights.iter_mut() {
            if !in_scope(strategy) {
                continue;
            }
            if pinned.contains(strategy) {
                *weight = floor;
            } else if free_total > 0.0 {
                *weight = *weight / free_total * free_mass;
            }
        }
    }
}
