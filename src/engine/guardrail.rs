//! Terminal-decision guardrail

use super::classifier::{ClassificationRecord, RejectionType};
use crate::config::EngineConfig;
use serde::{Serialize, Serializer};
use std::fmt;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Accepted,
    Declined,
    EndedConversation,
    MaxTurns(u32),
    TrustTooLow,
}

impl StopReason {
    pub fn is_acceptance(self) -> bool {
        matches!(self, StopReason::Accepted)
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Accepted => f.write_str("User accepted"),
            StopReason::Declined => f.write_str("User declined donation"),
            StopReason::EndedConversation => f.write_str("User ended conversation"),
            StopReason::MaxTurns(max) => write!(f, "Max turns ({max})"),
            StopReason::TrustTooLow => f.write_str("Trust too low"),
        }
    }
}

impl Serialize for StopReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of a guardrail check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Continue,
    Stop(StopReason),
}

impl Verdict {
    pub fn reason(self) -> Option<StopReason> {
        match self {
            Verdict::Continue => None,
            Verdict::Stop(reason) => Some(reason),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Guardrail {
    turns: u32,
    consecutive_rejections: u32,
    max_turns: u32,
    trust_floor: f64,
}

impl Guardrail {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            turns: 0,
            consecutive_rejections: 0,
            max_turns: config.max_turns,
            trust_floor: config.trust_floor,
        }
    }

    /// Update the rejection streak, then evaluate stop conditions in order.
    ///
    /// A polite exit that is not itself resistance holds the streak rather
    /// than resetting it, so a farewell after pushback ends the session
    /// while a farewell with no prior resistance does not.
    pub fn check(&mut self, record: &ClassificationRecord, trust: f64, belief: f64) -> Verdict {
        self.turns += 1;

        if record.rejection_type.is_resistance() {
            self.consecutive_rejections += 1;
        } else if !record.is_polite_exit {
            self.consecutive_rejections = 0;
        }

        let verdict = if record.is_acceptance {
            Verdict::Stop(StopReason::Accepted)
        } else if record.rejection_type == RejectionType::Explicit && !record.is_polite_exit {
            Verdict::Stop(StopReason::Declined)
        } else if record.is_polite_exit && self.consecutive_rejections >= 1 {
            Verdict::Stop(StopReason::EndedConversation)
        } else if self.turns >= self.max_turns {
            Verdict::Stop(StopReason::MaxTurns(self.max_turns))
        } else if trust < self.trust_floor {
            Verdict::Stop(StopReason::TrustTooLow)
        } else {
            Verdict::Continue
        };

        tracing::debug!(
            turn = self.turns,
            streak = self.consecutive_rejections,
            trust,
            belief,
            ?verdict,
            "Guardrail check"
        );
        verdict
    }

    pub fn consecutive_rejections(&self) -> u32 {
        self.consecutive_rejections
    }
}
