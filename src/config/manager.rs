use super::{
    decoder::DecoderConfig, genome::GenomeConfig, grover::GroverConfig, traits::ConfigSection,
};
use crate::error::QgenError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Prefix of environment overrides, e.g. `QGEN_DECODER__MAX_WRAPS=4`
pub const ENV_PREFIX: &str = "QGEN";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub decoder: DecoderConfig,
    pub grover: GroverConfig,
    pub genome: GenomeConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), QgenError> {
        self.decoder.validate()?;
        self.grover.validate()?;
        self.genome.validate()?;
        Ok(())
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, QgenError> {
        let config: AppConfig = toml::from_str(contents)
            .map_err(|e| QgenError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    /// TOML file first, then `QGEN_*` environment overrides
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), QgenError> {
        self.load_layered(path.as_ref(), ENV_PREFIX)
    }

    fn load_layered(&self, path: &Path, env_prefix: &str) -> Result<(), QgenError> {
        if !path.exists() {
            return Err(QgenError::Configuration(format!(
                "Failed to read config: {} does not exist",
                path.display()
            )));
        }

        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path).format(::config::FileFormat::Toml))
            .add_source(
                ::config::Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| QgenError::Configuration(format!("Failed to load config: {}", e)))?;

        let config: AppConfig = settings
            .try_deserialize()
            .map_err(|e| QgenError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        log::debug!("Loaded configuration from {}", path.display());
        *self.config.write().unwrap_or_else(|e| e.into_inner()) = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), QgenError> {
        let config = self.get();
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| QgenError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| QgenError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Apply `f` and keep the result only if it still validates
    pub fn update<F>(&self, f: F) -> Result<(), QgenError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.config.write().unwrap_or_else(|e| e.into_inner());
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AppConfig::from_toml_str("[decoder]\nmax_wraps = 5\n").unwrap();
        assert_eq!(config.decoder.max_wraps, 5);
        assert_eq!(config.decoder.max_tokens, DecoderConfig::default().max_tokens);
        assert_eq!(config.grover.num_qubits, 3);
    }

    #[test]
    fn test_invalid_section_rejected() {
        let err = AppConfig::from_toml_str("[grover]\nnum_qubits = 9\n").unwrap_err();
        assert!(matches!(err, QgenError::Configuration(_)));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qgen.toml");

        let manager = ConfigManager::new();
        manager.update(|c| c.genome.length = 12).unwrap();
        manager.save_to_file(&path).unwrap();

        let loaded = ConfigManager::new();
        loaded.load_layered(&path, "QGEN_TEST_NO_SUCH_PREFIX").unwrap();
        assert_eq!(loaded.get().genome.length, 12);
    }

    #[test]
    fn test_environment_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[decoder]\nmax_wraps = 1").unwrap();

        std::env::set_var("QGENENVTEST_DECODER__MAX_WRAPS", "7");
        let manager = ConfigManager::new();
        manager.load_layered(file.path(), "QGENENVTEST").unwrap();
        std::env::remove_var("QGENENVTEST_DECODER__MAX_WRAPS");

        assert_eq!(manager.get().decoder.max_wraps, 7);
    }

    #[test]
    fn test_rejected_update_keeps_previous() {
        let manager = ConfigManager::new();
        assert!(manager.update(|c| c.grover.num_qubits = 0).is_err());
        assert_eq!(manager.get().grover.num_qubits, 3);
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let err = ConfigManager::new()
            .load_from_file("/definitely/not/here.toml")
            .unwrap_err();
        assert!(matches!(err, QgenError::Configuration(_)));
    }
}
