use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Resource usage of the derivation that produced a phenotype
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivationStats {
    pub codons_consumed: usize,
    pub wraps: usize,
    pub expansions: usize,
    /// Codons of the genome that were read at least once
    pub effective_length: usize,
}

/// Decoded program as an ordered list of terminal literals.
///
/// Equality and hashing only look at the tokens, so two genomes that decode
/// to the same program compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phenotype {
    tokens: Vec<String>,
    stats: DerivationStats,
}

impl Phenotype {
    pub fn new(tokens: Vec<String>, stats: DerivationStats) -> Self {
        Self { tokens, stats }
    }

    pub fn from_tokens(tokens: Vec<String>) -> Self {
        Self::new(tokens, DerivationStats::default())
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn stats(&self) -> &DerivationStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn into_tokens(self) -> Vec<String> {
        self.tokens
    }
}

impl PartialEq for Phenotype {
    fn eq(&self, other: &Self) -> bool {
        self.tokens == other.tokens
    }
}

impl Eq for Phenotype {}

impl Hash for Phenotype {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tokens.hash(state);
    }
}
