pub mod config;
pub mod engines;
pub mod error;
pub mod grammar;
pub mod phenotype;

pub use engines::generation::{DerivationEngine, Genome, GenomeReader};
pub use error::{OverflowReason, QgenError, Result};
pub use grammar::{Grammar, GrammarBuilder, GroverGrammar, Symbol};
pub use phenotype::{Phenotype, PhenotypeValidator, Renderer, ORACLE_BEGIN, ORACLE_END};
