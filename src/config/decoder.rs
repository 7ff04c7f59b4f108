use super::traits::ConfigSection;
use crate::error::QgenError;
use serde::{Deserialize, Serialize};

/// Budgets for a single genome decode
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// How many times the genome may be reused from the start
    pub max_wraps: usize,
    pub max_tokens: usize,
    pub max_expansions: usize,
    /// Codons must be strictly below this value when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codon_bound: Option<u32>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_wraps: 2,
            max_tokens: 10_000,
            max_expansions: 100_000,
            codon_bound: None,
        }
    }
}

impl ConfigSection for DecoderConfig {
    fn section_name() -> &'static str {
        "decoder"
    }

    fn validate(&self) -> Result<(), QgenError> {
        if self.max_tokens == 0 {
            return Err(QgenError::Configuration(
                "max_tokens must be at least 1".to_string(),
            ));
        }
        if self.max_expansions == 0 {
            return Err(QgenError::Configuration(
                "max_expansions must be at least 1".to_string(),
            ));
        }
        if self.codon_bound == Some(0) {
            return Err(QgenError::Configuration(
                "codon_bound must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
