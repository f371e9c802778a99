//! Prompt construction for the hosted model

use super::{Exchange, GenerationRequest};
use crate::engine::{DonationContext, Strategy};
use std::fmt::Write;

fn strategy_guide(strategy: Strategy, context: &DonationContext) -> String {
    match strategy {
        Strategy::Empathy => {
            "Respond with empathy and understanding. Acknowledge their feelings warmly.".to_string()
        }
        Strategy::Impact => format!(
            "Share concrete impact: {}. Use numbers and specific outcomes.",
            context.impact
        ),
        Strategy::SocialProof => {
            "Mention that others in the community are contributing. Make it aspirational."
                .to_string()
        }
        Strategy::Transparency => {
            "Be completely honest. Explain where money goes. Build trust through openness."
                .to_string()
        }
        Strategy::EthicalUrgency => {
            "Mention time-sensitive need gently. No pressure. Use soft phrases.".to_string()
        }
    }
}

fn render_history(recent: &[Exchange]) -> String {
    recent.iter().fold(String::new(), |mut out, exchange| {
        let _ = writeln!(out, "User: {}\nAgent: {}", exchange.user, exchange.agent);
        out
    })
}

pub(super) fn strategy_prompt(request: &GenerationRequest) -> String {
    let ctx = &request.context;
    format!(
        r#"You are a fundraising assistant for {org}, working on {cause}.

Suggested donation amounts: ₹{amounts}
Impact example: {impact}

CONVERSATION SO FAR:
{history}
USER JUST SAID: "{user}"
User seems: {sentiment}

YOUR STRATEGY: {strategy}
{guide}

CRITICAL RULES:
- If they're asking questions, ANSWER them specifically
- Don't assume they want to donate from curiosity
- Keep under 50 words
- Be natural and conversational
- Build on previous conversation

Your response:"#,
        org = ctx.organization,
        cause = ctx.cause,
        amounts = ctx.amounts,
        impact = ctx.impact,
        history = render_history(&request.recent),
        user = request.user_text,
        sentiment = request.sentiment.as_str(),
        strategy = request.strategy,
        guide = strategy_guide(request.strategy, ctx),
    )
}

pub(super) fn recovery_prompt(request: &GenerationRequest) -> String {
    format!(
        r#"You are a fundraising assistant for {org} in TRUST RECOVERY mode.

CONVERSATION SO FAR:
{history}
USER JUST SAID: "{user}"
User seems: {sentiment}

They're uncomfortable. Your ONLY job:
1. Apologize sincerely
2. Reassure NO pressure
3. Offer to answer questions
4. Step back from donation completely

Keep under 40 words. Rebuild trust, NOT donation.

Your response:"#,
        org = request.context.organization,
        history = render_history(&request.recent),
        user = request.user_text,
        sentiment = request.sentiment.as_str(),
    )
}
