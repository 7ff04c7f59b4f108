use super::traits::ConfigSection;
use crate::error::QgenError;
use serde::{Deserialize, Serialize};

pub const MIN_QUBITS: usize = 2;
pub const MAX_QUBITS: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroverConfig {
    pub num_qubits: usize,
}

impl Default for GroverConfig {
    fn default() -> Self {
        Self { num_qubits: 3 }
    }
}

impl ConfigSection for GroverConfig {
    fn section_name() -> &'static str {
        "grover"
    }

    fn validate(&self) -> Result<(), QgenError> {
        if !(MIN_QUBITS..=MAX_QUBITS).contains(&self.num_qubits) {
            return Err(QgenError::Configuration(format!(
                "num_qubits must be between {} and {}, got {}",
                MIN_QUBITS, MAX_QUBITS, self.num_qubits
            )));
        }
        Ok(())
    }
}
