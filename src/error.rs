use thiserror::Error;

/// Which budget a derivation ran out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowReason {
    Wraps,
    Tokens,
    Expansions,
}

impl std::fmt::Display for OverflowReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverflowReason::Wraps => write!(f, "genome wrap limit"),
            OverflowReason::Tokens => write!(f, "output token limit"),
            OverflowReason::Expansions => write!(f, "expansion limit"),
        }
    }
}

#[derive(Error, Debug)]
pub enum QgenError {
    #[error("Grammar error: {0}")]
    Grammar(String),

    #[error("Invalid genome: {0}")]
    InvalidGenome(String),

    #[error(
        "Derivation overflow ({reason}) after {codons_consumed} codons, {wraps} wraps, {tokens} tokens"
    )]
    DerivationOverflow {
        reason: OverflowReason,
        codons_consumed: usize,
        wraps: usize,
        tokens: usize,
    },

    #[error("Sentinel not found: {0}")]
    SentinelNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl QgenError {
    /// Overflow is an expected outcome for some genomes; callers usually
    /// score it as the worst fitness instead of propagating it.
    pub fn is_overflow(&self) -> bool {
        matches!(self, QgenError::DerivationOverflow { .. })
    }
}

pub type Result<T> = std::result::Result<T, QgenError>;
