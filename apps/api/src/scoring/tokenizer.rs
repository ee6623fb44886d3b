//! Tokenizer — lower-cases text and splits it into alphanumeric word tokens.

use std::collections::HashMap;

/// Token → occurrence count. Keys are lower-cased and unique.
pub type FrequencyMap = HashMap<String, u32>;

/// Tokens in document order plus their counts.
#[derive(Debug, Clone, Default)]
pub struct Tokenized {
    pub tokens: Vec<String>,
    pub frequencies: FrequencyMap,
}

impl Tokenized {
    /// Every occurrence counts, not just distinct keys.
    pub fn total(&self) -> usize {
        self.tokens.len()
    }
}

/// Splits on any non-alphanumeric character; punctuation and whitespace are dropped.
/// Empty input yields an empty result.
pub fn tokenize(text: &str) -> Tokenized {
    let lowered = text.to_lowercase();

    let tokens: Vec<String> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect();

    let mut frequencies = FrequencyMap::with_capacity(tokens.len());
    for token in &tokens {
        *frequencies.entry(token.clone()).or_insert(0) += 1;
    }

    Tokenized {
        tokens,
        frequencies,
    }
}
