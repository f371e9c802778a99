//! Lexicon polarity scoring
//!
//! Averages the polarity of every scored word. A negation within the two
//! preceding tokens flips and halves a word's polarity; an intensifier
//! directly before it scales it.

const LEXICON: &[(&str, f64)] = &[
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("beautiful", 0.85),
    ("best", 1.0),
    ("better", 0.5),
    ("brilliant", 0.9),
    ("cool", 0.35),
    ("excellent", 1.0),
    ("fantastic", 0.4),
    ("fine", 0.4167),
    ("glad", 0.5),
    ("good", 0.7),
    ("great", 0.8),
    ("happy", 0.8),
    ("helpful", 0.5),
    ("important", 0.4),
    ("impressive", 1.0),
    ("inspiring", 0.5),
    ("interested", 0.25),
    ("interesting", 0.5),
    ("kind", 0.6),
    ("like", 0.2),
    ("love", 0.5),
    ("lovely", 0.5),
    ("meaningful", 0.5),
    ("nice", 0.6),
    ("ok", 0.5),
    ("okay", 0.5),
    ("perfect", 1.0),
    ("positive", 0.2273),
    ("sure", 0.5),
    ("thoughtful", 0.5),
    ("useful", 0.3),
    ("wonderful", 1.0),
    ("worthwhile", 0.5),
    ("angry", -0.5),
    ("annoyed", -0.4),
    ("annoying", -0.8),
    ("awful", -1.0),
    ("bad", -0.7),
    ("boring", -1.0),
    ("creepy", -0.6),
    ("disappointed", -0.75),
    ("disgusting", -1.0),
    ("dishonest", -0.8),
    ("dumb", -0.375),
    ("fake", -0.5),
    ("frustrated", -0.4),
    ("hate", -0.8),
    ("horrible", -1.0),
    ("irritating", -0.6),
    ("pathetic", -1.0),
    ("poor", -0.4),
    ("pushy", -0.5),
    ("ridiculous", -0.3333),
    ("rude", -0.3),
    ("sad", -0.5),
    ("sketchy", -0.5),
    ("stupid", -0.8),
    ("suspicious", -0.1667),
    ("terrible", -1.0),
    ("uncomfortable", -0.5),
    ("unhappy", -0.6),
    ("upset", -0.5),
    ("useless", -0.5),
    ("waste", -0.2),
    ("worse", -0.4),
    ("worst", -1.0),
    ("wrong", -0.5),
];

const NEGATIONS: &[&str] = &["not", "no", "never", "nothing", "hardly", "without"];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("really", 1.3),
    ("so", 1.2),
    ("super", 1.3),
    ("too", 1.2),
    ("totally", 1.3),
    ("very", 1.3),
    ("quite", 1.1),
];

const NEGATION_WINDOW: usize = 2;

fn lookup(word: &str) -> Option<f64> {
    LEXICON
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, polarity)| *polarity)
}

fn intensity(word: &str) -> Option<f64> {
    INTENSIFIERS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, factor)| *factor)
}

fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word) || word.ends_with("n't")
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '\u{2019}'))
        .filter(|t| !t.is_empty())
        .map(|t| t.replace('\u{2019}', "'").to_lowercase())
        .collect()
}

/// Polarity in `[-1, 1]`; 0.0 when no word carries polarity
pub fn polarity(text: &str) -> f64 {
    let tokens = tokenize(text);
    let mut scores = Vec::new();
    let mut last_negation: Option<usize> = None;

    for (idx, token) in tokens.iter().enumerate() {
        if is_negation(token) {
            last_negation = Some(idx);
            continue;
        }
        let Some(base) = lookup(token) else {
            continue;
        };

        let factor = idx
            .checked_sub(1)
            .and_then(|prev| intensity(&tokens[prev]))
            .unwrap_or(1.0);
        let mut score = (base * factor).clamp(-1.0, 1.0);

        if last_negation.is_some_and(|n| idx - n <= NEGATION_WINDOW) {
            score *= -0.5;
            last_negation = None;
        }
        scores.push(score);
    }

    if scores.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)] // utterances are short
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    mean.clamp(-1.0, 1.0)
}
