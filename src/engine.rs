//! Closed-loop persuasion decision engine
//!
//! Each user utterance flows strictly downward: classification, belief and
//! trust updates, guardrail verdict, strategy selection, generation.

pub mod classifier;
mod guardrail;
mod orchestrator;
pub mod state;
mod strategy;
mod trackers;

#[cfg(test)]
mod proptests;
#[cfg(test)]
pub(crate) mod testing;

pub use classifier::SentimentLabel;
pub use guardrail::StopReason;
pub use orchestrator::Orchestrator;
pub use state::{
    DonationContext, MetricsReport, SessionSnapshot, TranscriptEntry, TurnResult, Variant,
};
pub use strategy::Strategy;

#[allow(unused_imports)] // Public API re-exports
pub use classifier::{classify, ClassificationRecord, RejectionType};
#[allow(unused_imports)] // Public API re-exports
pub use guardrail::{Guardrail, Verdict};
#[allow(unused_imports)] // Public API re-exports
pub use state::{SessionPhase, Speaker, TurnMetrics};
#[allow(unused_imports)] // Public API re-exports
pub use strategy::{RandomSource, StrategyAdapter};
#[allow(unused_imports)] // Public API re-exports
pub use trackers::{BeliefTracker, TrustTracker};
