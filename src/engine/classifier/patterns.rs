//! Ordered lexical rule tables
//!
//! Patterns are matched against lower-cased, trimmed text.

use regex::RegexSet;
use std::sync::LazyLock;

pub(super) const ACCEPTANCE: &[&str] = &[
    r"\b(yes.*i.*donate|i will donate|i'll donate|i want to donate)\b",
    r"\b(sign me up|count me in|i'm in)\b",
    r"\b(where do i donate|how do i donate|how can i donate)\b",
    r"(\bi'll give\b|\bi will give\b|\bi want to give ₹|\bi can give ₹)",
    r"\b(okay.*donate|ok.*donate|sure.*donate|let's do it)\b",
    r"\b(take my donation|here's my donation|ready to donate)\b",
];

pub(super) const EXPLICIT_REFUSAL: &[&str] = &[
    r"\b(no thanks|no thank you|not interested|don't want|won't donate)\b",
    r"\b(nope|nah|never|absolutely not|definitely not)\b",
    r"\b(leave me alone|stop asking|not doing|refuse)\b",
];

pub(super) const POLITE_EXIT: &[&str] = &[
    r"\b(okay thanks|ok thanks|okay thank you|ok thank you)\b",
    r"\b(thank you|thanks|appreciate it)\b$",
    r"\b(that's all|that is all|nothing else)\b",
    r"\b(i'm good|all good|we're good)\b",
];

pub(super) const SOFT_DECLINE: &[&str] = &[
    r"\b(maybe later|not now|not right now|some other time|another time)\b",
    r"\b(not today|can't right now|busy right now)\b",
    r"\b(not sure|unsure|uncertain|hesitant|doubtful)\b",
    r"\b(can't afford|no money|tight budget|broke|expensive)\b",
    r"\b(i'll think|let me think|need time|consider)\b",
];

pub(super) const TRUST_CONCERN: &[&str] = &[
    r"\b(pushy|aggressive|pressure|uncomfortable|sketchy|scam|fraud)\b",
    r"\b(suspicious|don't trust|seems fake|sounds fake)\b",
    r"\b(why are you|what's your motive|prove it)\b",
];

pub(super) const CURIOSITY: &[&str] = &[
    r"\b(tell me more|tell me about|what about|explain|how does|how do)\b",
    r"\b(more info|more details|details|information)\b",
    r"\b(curious|interested in learning|want to know|want to hear)\b",
    r"\b(what is|who are|where does|when|why)\b",
    r"\b(can you|could you|would you.*explain|show me)\b",
];

/// Compiled rule tables
pub(super) struct RuleTables {
    pub acceptance: RegexSet,
    pub explicit_refusal: RegexSet,
    pub polite_exit: RegexSet,
    pub soft_decline: RegexSet,
    pub trust_concern: RegexSet,
    pub curiosity: RegexSet,
}

impl RuleTables {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            acceptance: RegexSet::new(ACCEPTANCE)?,
            explicit_refusal: RegexSet::new(EXPLICIT_REFUSAL)?,
            polite_exit: RegexSet::new(POLITE_EXIT)?,
            soft_decline: RegexSet::new(SOFT_DECLINE)?,
            trust_concern: RegexSet::new(TRUST_CONCERN)?,
            curiosity: RegexSet::new(CURIOSITY)?,
        })
    }
}

/// Tables are static data; a failure here is a bug in the literals above,
/// caught by `test_tables_compile`.
pub(super) static RULES: LazyLock<Option<RuleTables>> = LazyLock::new(|| match RuleTables::compile() {
    Ok(tables) => Some(tables),
    Err(e) => {
        tracing::error!(error = %e, "Utterance rule tables failed to compile");
        None
    }
});
