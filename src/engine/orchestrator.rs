//! Per-session dialogue orchestration
//!
//! A turn is split in two: [`Orchestrator::advance`] is synchronous and
//! commits every state change the utterance causes, then `process` awaits
//! the generator and records the agent's reply. Generation failures never
//! roll back what `advance` committed.

use super::classifier::{classify, ClassificationRecord};
use super::guardrail::{Guardrail, StopReason};
use super::state::{
    round3, DonationContext, MetricsReport, SessionPhase, SessionSnapshot, Speaker,
    TranscriptEntry, TurnMetrics, TurnResult, Variant,
};
use super::strategy::{RandomSource, Strategy, StrategyAdapter};
use super::trackers::{BeliefTracker, TrustTracker};
use crate::config::EngineConfig;
use crate::generation::fallback::{closing_line, fallback_line, opening_line};
use crate::generation::{Exchange, GenerationRequest, Generator};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Exchanges of history handed to the generator
const MEMORY_EXCHANGES: usize = 3;

/// Outcome of the synchronous half of a turn
enum Step {
    Closed(TurnResult),
    Generate {
        request: GenerationRequest,
        metrics: TurnMetrics,
    },
}

pub struct Orchestrator {
    variant: Variant,
    context: DonationContext,
    belief: BeliefTracker,
    trust: TrustTracker,
    adapter: StrategyAdapter,
    guardrail: Guardrail,
    transcript: Vec<TranscriptEntry>,
    turn: u32,
    phase: SessionPhase,
    last_record: Option<ClassificationRecord>,
    last_metrics: Option<TurnMetrics>,
    rng: Box<dyn RandomSource>,
}

impl Orchestrator {
    pub fn new(
        config: &EngineConfig,
        variant: Variant,
        context: DonationContext,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            variant,
            context,
            belief: BeliefTracker::new(config),
            trust: TrustTracker::new(config),
            adapter: StrategyAdapter::new(config),
            guardrail: Guardrail::new(config),
            transcript: Vec::new(),
            turn: 0,
            phase: SessionPhase::AwaitingInput,
            last_record: None,
            last_metrics: None,
            rng,
        }
    }

    /// Orchestrator with an entropy-seeded sampler
    pub fn with_entropy(config: &EngineConfig, variant: Variant, context: DonationContext) -> Self {
        Self::new(config, variant, context, Box::new(StdRng::from_entropy()))
    }

    /// Opening line, recorded once as turn 0
    pub fn start(&mut self) -> String {
        if let Some(first) = self.transcript.first() {
            return first.msg.clone();
        }
        let opening = opening_line(&self.context);
        self.transcript
            .push(TranscriptEntry::agent(0, opening.clone(), Some(Strategy::DEFAULT)));
        opening
    }

    /// Run one user utterance through the loop and produce the agent reply
    pub async fn process(&mut self, text: &str, generator: &dyn Generator) -> TurnResult {
        if let SessionPhase::Terminated { outcome, closing } = &self.phase {
            return TurnResult {
                agent_msg: closing.clone(),
                stop: true,
                reason: Some(*outcome),
                metrics: self
                    .last_metrics
                    .clone()
                    .unwrap_or_else(|| self.current_metrics()),
            };
        }

        let (request, metrics) = match self.advance(text) {
            Step::Closed(result) => return result,
            Step::Generate { request, metrics } => (request, metrics),
        };

        let reply = match generator.generate(&request).await {
            Ok(reply) if !reply.trim().is_empty() => reply.trim().to_string(),
            Ok(_) => {
                tracing::warn!(turn = self.turn, strategy = %request.strategy, "Generator returned empty text, using fallback");
                fallback_line(request.strategy, request.recovery, &self.context)
            }
            Err(e) => {
                tracing::warn!(
                    turn = self.turn,
                    strategy = %request.strategy,
                    kind = ?e.kind,
                    error = %e,
                    "Generation failed, using fallback"
                );
                fallback_line(request.strategy, request.recovery, &self.context)
            }
        };

        self.transcript.push(TranscriptEntry::agent(
            self.turn,
            reply.clone(),
            Some(request.strategy),
        ));

        TurnResult {
            agent_msg: reply,
            stop: false,
            reason: None,
            metrics,
        }
    }

    fn advance(&mut self, text: &str) -> Step {
        self.turn += 1;
        let record = classify(text);
        let previous = self.last_agent_strategy();

        // Belief is gated on trust as it stood before this utterance
        let delta_belief = self.belief.update(&record, self.trust.get());
        let delta_trust = if self.variant.updates_trust() {
            self.trust.update(&record, previous).0
        } else {
            0.0
        };

        let verdict = self
            .guardrail
            .check(&record, self.trust.get(), self.belief.get());
        self.last_record = Some(record.clone());

        if let Some(reason) = verdict.reason() {
            return Step::Closed(self.terminate(text, record, reason, delta_belief, delta_trust));
        }

        let restricted = self.variant.restricts_in_recovery() && self.trust.recovery_mode();
        let chosen = match self.variant.fixed_strategy() {
            Some(strategy) => strategy,
            None => self.adapter.select(restricted, self.rng.as_mut()),
        };
        if self.variant.adapts_weights() {
            self.adapter.adapt(previous, &record, restricted);
        }

        let metrics = self.metrics(&record, delta_belief, delta_trust);
        let request = GenerationRequest {
            strategy: chosen,
            user_text: text.to_string(),
            turn: self.turn,
            recovery: self.trust.recovery_mode(),
            sentiment: record.sentiment_label,
            recent: self.recent_exchanges(),
            context: self.context.clone(),
        };

        tracing::debug!(
            turn = self.turn,
            rejection = ?record.rejection_type,
            belief = self.belief.get(),
            trust = self.trust.get(),
            strategy = %chosen,
            "Turn planned"
        );

        self.transcript
            .push(TranscriptEntry::user(self.turn, text, record));
        self.last_metrics = Some(metrics.clone());
        Step::Generate { request, metrics }
    }

    fn terminate(
        &mut self,
        text: &str,
        record: ClassificationRecord,
        reason: StopReason,
        delta_belief: f64,
        delta_trust: f64,
    ) -> TurnResult {
        let closing = closing_line(reason).to_string();
        let metrics = self.metrics(&record, delta_belief, delta_trust);

        self.transcript
            .push(TranscriptEntry::user(self.turn, text, record));
        self.transcript
            .push(TranscriptEntry::agent(self.turn, closing.clone(), None));
        self.phase = SessionPhase::Terminated {
            outcome: reason,
            closing: closing.clone(),
        };
        self.last_metrics = Some(metrics.clone());

        tracing::info!(
            turn = self.turn,
            variant = %self.variant,
            %reason,
            belief = self.belief.get(),
            trust = self.trust.get(),
            "Session terminated"
        );

        TurnResult {
            agent_msg: closing,
            stop: true,
            reason: Some(reason),
            metrics,
        }
    }

    fn last_agent_strategy(&self) -> Strategy {
        self.transcript
            .iter()
            .rev()
            .find(|entry| entry.speaker == Speaker::Agent)
            .and_then(|entry| entry.strategy)
            .unwrap_or(Strategy::DEFAULT)
    }

    fn recent_exchanges(&self) -> Vec<Exchange> {
        let mut exchanges = Vec::new();
        let mut pending_user: Option<&str> = None;
        for entry in &self.transcript {
            match entry.speaker {
                Speaker::User => pending_user = Some(entry.msg.as_str()),
                Speaker::Agent => {
                    if let Some(user) = pending_user.take() {
                        exchanges.push(Exchange {
                            user: user.to_string(),
                            agent: entry.msg.clone(),
                        });
                    }
                }
            }
        }
        let skip = exchanges.len().saturating_sub(MEMORY_EXCHANGES);
        exchanges.split_off(skip)
    }

    fn metrics(&self, record: &ClassificationRecord, delta_belief: f64, delta_trust: f64) -> TurnMetrics {
        TurnMetrics {
            turn: self.turn,
            belief: round3(self.belief.get()),
            trust: round3(self.trust.get()),
            delta_belief: round3(delta_belief),
            delta_trust: round3(delta_trust),
            rejection_type: record.rejection_type,
            rejection_conf: round3(record.rejection_confidence),
            sentiment: record.sentiment_label,
            sentiment_score: round3(record.sentiment_score),
            trust_concern: record.trust_concern,
            is_curiosity: record.is_curiosity,
            recovery_mode: self.trust.recovery_mode(),
            strategy_weights: self
                .adapter
                .weights()
                .iter()
                .map(|(strategy, weight)| (*strategy, round3(*weight)))
                .collect(),
            consec_reject: self.guardrail.consecutive_rejections(),
        }
    }

    /// Metrics for the last classified utterance with zero deltas
    pub fn current_metrics(&self) -> TurnMetrics {
        let record = self
            .last_record
            .clone()
            .unwrap_or_else(|| ClassificationRecord::no_signal(0.0));
        self.metrics(&record, 0.0, 0.0)
    }

    pub fn metrics_report(&self) -> MetricsReport {
        MetricsReport {
            metrics: self.current_metrics(),
            belief_history: self.belief.history().to_vec(),
            trust_history: self.trust.history().to_vec(),
            weight_history: self.adapter.history().clone(),
            strategy_counts: self.adapter.counts().clone(),
            active: self.is_active(),
            outcome: self.outcome(),
        }
    }

    pub fn snapshot(&self, session_id: &str) -> SessionSnapshot {
        SessionSnapshot {
            session_id: session_id.to_string(),
            condition: self.variant,
            timestamp: chrono::Utc::now(),
            context: self.context.clone(),
            history: self.transcript.clone(),
            final_belief: self.belief.get(),
            final_trust: self.trust.get(),
            turns: self.turn,
            outcome: self.outcome(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }

    pub fn outcome(&self) -> Option<StopReason> {
        match &self.phase {
            SessionPhase::AwaitingInput => None,
            SessionPhase::Terminated { outcome, .. } => Some(*outcome),
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn context(&self) -> &DonationContext {
        &self.context
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }
}
