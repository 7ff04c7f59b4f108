pub mod derivation;
pub mod gene_consumer;
pub mod genome;
pub mod operators;

pub use derivation::{Choice, DerivationEngine};
pub use gene_consumer::GenomeReader;
pub use genome::Genome;
pub use operators::{random_genome, random_genomes};
