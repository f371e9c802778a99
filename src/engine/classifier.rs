//! Utterance classification
//!
//! Lexical rule tables are the primary signal. Sentiment only fills gaps
//! (ambiguous resistance) or escalates a soft decline; it never downgrades
//! a lexical rejection.

mod patterns;
mod sentiment;

use patterns::RULES;
use serde::{Deserialize, Serialize};

use sentiment::polarity;

const ACCEPTANCE_SENTIMENT: f64 = 0.9;
const CURIOSITY_SENTIMENT_FLOOR: f64 = 0.2;
const AMBIGUOUS_SENTIMENT: f64 = -0.4;
const ESCALATION_SENTIMENT: f64 = -0.6;

const EXPLICIT_CONFIDENCE: f64 = 0.9;
const SOFT_CONFIDENCE: f64 = 0.7;
const AMBIGUOUS_CONFIDENCE: f64 = 0.5;
const ESCALATED_CONFIDENCE: f64 = 0.85;

/// Kind of listener resistance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RejectionType {
    #[default]
    None,
    Curiosity,
    Ambiguous,
    Soft,
    Explicit,
}

impl RejectionType {
    /// Types that count toward a rejection streak
    pub fn is_resistance(self) -> bool {
        matches!(self, Self::Ambiguous | Self::Soft | Self::Explicit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn from_score(score: f64) -> Self {
        if score > 0.0 {
            Self::Positive
        } else if score < 0.0 {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

/// Structured reading of one utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)] // independent flags layered on the rejection type
pub struct ClassificationRecord {
    pub rejection_type: RejectionType,
    pub rejection_confidence: f64,
    pub trust_concern: bool,
    pub sentiment_score: f64,
    pub sentiment_label: SentimentLabel,
    pub is_acceptance: bool,
    pub is_curiosity: bool,
    pub is_polite_exit: bool,
}

impl ClassificationRecord {
    /// No lexical signal; sentiment is still carried
    pub fn no_signal(sentiment_score: f64) -> Self {
        Self {
            rejection_type: RejectionType::None,
            rejection_confidence: 0.0,
            trust_concern: false,
            sentiment_score,
            sentiment_label: SentimentLabel::from_score(sentiment_score),
            is_acceptance: false,
            is_curiosity: false,
            is_polite_exit: false,
        }
    }

    fn acceptance() -> Self {
        Self {
            is_acceptance: true,
            ..Self::no_signal(ACCEPTANCE_SENTIMENT)
        }
    }
}

/// Classify a raw utterance. Total: never fails.
pub fn classify(text: &str) -> ClassificationRecord {
    let msg = text.trim().to_lowercase();
    let score = polarity(text);

    let Some(rules) = RULES.as_ref() else {
        return ClassificationRecord::no_signal(score);
    };

    if rules.acceptance.is_match(&msg) {
        return ClassificationRecord::acceptance();
    }

    let is_curiosity = rules.curiosity.is_match(&msg);

    let (mut rejection_type, mut confidence) = if rules.explicit_refusal.is_match(&msg) {
        (RejectionType::Explicit, EXPLICIT_CONFIDENCE)
    } else if rules.soft_decline.is_match(&msg) {
        (RejectionType::Soft, SOFT_CONFIDENCE)
    } else {
        (RejectionType::None, 0.0)
    };

    let trust_concern = rules.trust_concern.is_match(&msg);
    let mut sentiment_score = score;

    if is_curiosity && rejection_type == RejectionType::None {
        rejection_type = RejectionType::Curiosity;
        sentiment_score = sentiment_score.max(CURIOSITY_SENTIMENT_FLOOR);
    }

    if rejection_type == RejectionType::None && sentiment_score < AMBIGUOUS_SENTIMENT {
        rejection_type = RejectionType::Ambiguous;
        confidence = AMBIGUOUS_CONFIDENCE;
    }

    if rejection_type == RejectionType::Soft && sentiment_score < ESCALATION_SENTIMENT {
        rejection_type = RejectionType::Explicit;
        confidence = ESCALATED_CONFIDENCE;
    }

    // A refusal that ends in thanks is still a refusal
    let is_polite_exit =
        rules.polite_exit.is_match(&msg) && rejection_type != RejectionType::Explicit;

    ClassificationRecord {
        rejection_type,
        rejection_confidence: confidence,
        trust_concern,
        sentiment_score,
        sentiment_label: SentimentLabel::from_score(sentiment_score),
        is_acceptance: false,
        is_curiosity,
        is_polite_exit,
    }
}
