//! Deterministic agent lines
//!
//! Used for the opening and closing of a session and whenever generation
//! fails.

use crate::engine::{DonationContext, StopReason, Strategy};

pub fn opening_line(context: &DonationContext) -> String {
    format!(
        "Hello! I'm from {}. We're working on {}. Would you like to learn more about what we do?",
        context.organization, context.cause
    )
}

pub fn closing_line(reason: StopReason) -> &'static str {
    if reason.is_acceptance() {
        "Thank you so much! Your donation will make a real difference."
    } else {
        "Thank you for your time. I respect your decision."
    }
}

/// Stand-in utterance when the generator cannot produce one
pub fn fallback_line(strategy: Strategy, recovery: bool, context: &DonationContext) -> String {
    if recovery {
        return "I apologize if I seemed pushy. There's no pressure at all - I'm happy to answer any questions you have."
            .to_string();
    }

    match strategy {
        Strategy::Empathy => {
            "I understand where you're coming from. What questions do you have about our work?"
                .to_string()
        }
        Strategy::Impact => format!(
            "For context: {}. Every contribution helps real families.",
            context.impact
        ),
        Strategy::SocialProof => {
            "Many people in our community are supporting this cause. Would you like to learn more?"
                .to_string()
        }
        Strategy::Transparency => {
            "I'm happy to share exactly where donations go and how they're used. What would you like to know?"
                .to_string()
        }
        Strategy::EthicalUrgency => {
            "This month we're focused on urgent needs, but there's no pressure. What questions can I answer?"
                .to_string()
        }
    }
}
