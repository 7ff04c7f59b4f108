pub mod model;
pub mod oracle;
pub mod renderer;
pub mod validator;

pub use model::{DerivationStats, Phenotype};
pub use oracle::{extract_oracle_text, substitute_oracle_text, ORACLE_BEGIN, ORACLE_END};
pub use renderer::Renderer;
pub use validator::PhenotypeValidator;
