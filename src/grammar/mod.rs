pub mod bnf;
pub mod catalog;
pub mod grover;
pub mod model;

pub use bnf::parse_bnf;
pub use grover::GroverGrammar;
pub use model::{Alternative, Grammar, GrammarBuilder, Symbol};
