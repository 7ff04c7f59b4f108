use super::traits::ConfigSection;
use crate::error::QgenError;
use serde::{Deserialize, Serialize};

/// Shape of randomly initialised genomes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenomeConfig {
    pub length: usize,
    /// Exclusive upper bound of codon values
    pub codon_max: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for GenomeConfig {
    fn default() -> Self {
        Self {
            length: 64,
            codon_max: 256,
            seed: None,
        }
    }
}

impl ConfigSection for GenomeConfig {
    fn section_name() -> &'static str {
        "genome"
    }

    fn validate(&self) -> Result<(), QgenError> {
        if self.length == 0 {
            return Err(QgenError::Configuration(
                "Genome length must be at least 1".to_string(),
            ));
        }
        if self.codon_max == 0 {
            return Err(QgenError::Configuration(
                "codon_max must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
