//! Session state, variants and outward-facing payloads

use super::classifier::{ClassificationRecord, RejectionType, SentimentLabel};
use super::guardrail::StopReason;
use super::strategy::Strategy;
use crate::config::ConfigError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Variant
// ============================================================================

/// Which optional pipeline steps a session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// One fixed strategy forever; trust and weights frozen
    Static,
    /// Weights adapt, trust is frozen
    AdaptiveNoTrust,
    /// Full loop with trust updates and recovery-restricted selection
    AdaptiveWithTrust,
}

impl Variant {
    pub fn updates_trust(self) -> bool {
        matches!(self, Variant::AdaptiveWithTrust)
    }

    pub fn adapts_weights(self) -> bool {
        matches!(self, Variant::AdaptiveNoTrust | Variant::AdaptiveWithTrust)
    }

    pub fn restricts_in_recovery(self) -> bool {
        matches!(self, Variant::AdaptiveWithTrust)
    }

    pub fn fixed_strategy(self) -> Option<Strategy> {
        match self {
            Variant::Static => Some(Strategy::Empathy),
            Variant::AdaptiveNoTrust | Variant::AdaptiveWithTrust => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Static => "static",
            Variant::AdaptiveNoTrust => "adaptive-no-trust",
            Variant::AdaptiveWithTrust => "adaptive-with-trust",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = ConfigError;

    /// Accepts the kebab-case names and the study condition codes `C1`–`C3`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" | "c1" => Ok(Variant::Static),
            "adaptive-no-trust" | "c2" => Ok(Variant::AdaptiveNoTrust),
            "adaptive-with-trust" | "c3" => Ok(Variant::AdaptiveWithTrust),
            _ => Err(ConfigError::UnsupportedVariant(s.to_string())),
        }
    }
}

// ============================================================================
// Campaign Context
// ============================================================================

/// Campaign the agent is raising money for
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DonationContext {
    pub organization: String,
    pub cause: String,
    #[serde(default)]
    pub amounts: String,
    #[serde(default)]
    pub impact: String,
}

// ============================================================================
// Lifecycle and Transcript
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionPhase {
    AwaitingInput,
    /// Absorbing: only the closing line and frozen metrics are produced
    Terminated { outcome: StopReason, closing: String },
}

impl SessionPhase {
    pub fn is_active(&self) -> bool {
        matches!(self, SessionPhase::AwaitingInput)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Agent,
    User,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptEntry {
    pub turn: u32,
    pub speaker: Speaker,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<ClassificationRecord>,
}

impl TranscriptEntry {
    pub fn agent(turn: u32, msg: impl Into<String>, strategy: Option<Strategy>) -> Self {
        Self {
            turn,
            speaker: Speaker::Agent,
            msg: msg.into(),
            strategy,
            info: None,
        }
    }

    pub fn user(turn: u32, msg: impl Into<String>, info: ClassificationRecord) -> Self {
        Self {
            turn,
            speaker: Speaker::User,
            msg: msg.into(),
            strategy: None,
            info: Some(info),
        }
    }
}

// ============================================================================
// Payloads
// ============================================================================

pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Metrics snapshot returned with every processed utterance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnMetrics {
    pub turn: u32,
    pub belief: f64,
    pub trust: f64,
    pub delta_belief: f64,
    pub delta_trust: f64,
    pub rejection_type: RejectionType,
    pub rejection_conf: f64,
    pub sentiment: SentimentLabel,
    pub sentiment_score: f64,
    pub trust_concern: bool,
    pub is_curiosity: bool,
    pub recovery_mode: bool,
    pub strategy_weights: BTreeMap<Strategy, f64>,
    pub consec_reject: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TurnResult {
    pub agent_msg: String,
    pub stop: bool,
    pub reason: Option<StopReason>,
    pub metrics: TurnMetrics,
}

/// Current metrics plus full histories
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    #[serde(flatten)]
    pub metrics: TurnMetrics,
    pub belief_history: Vec<f64>,
    pub trust_history: Vec<f64>,
    pub weight_history: BTreeMap<Strategy, Vec<f64>>,
    pub strategy_counts: BTreeMap<Strategy, u32>,
    pub active: bool,
    pub outcome: Option<StopReason>,
}

/// Audit export of a whole session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub condition: Variant,
    pub timestamp: DateTime<Utc>,
    pub context: DonationContext,
    pub history: Vec<TranscriptEntry>,
    pub final_belief: f64,
    pub final_trust: f64,
    pub turns: u32,
    pub outcome: Option<StopReason>,
}
