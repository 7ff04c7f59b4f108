use super::model::Phenotype;

/// Turns token sequences into program text: plain in-order concatenation,
/// one instruction per line.
pub struct Renderer;

impl Renderer {
    pub fn render(phenotype: &Phenotype) -> String {
        Self::render_tokens(phenotype.tokens())
    }

    pub fn render_tokens<S: AsRef<str>>(tokens: &[S]) -> String {
        let mut out = String::with_capacity(tokens.iter().map(|t| t.as_ref().len()).sum());
        for token in tokens {
            out.push_str(token.as_ref());
        }
        out
    }

    /// Non-blank lines of the rendered program
    pub fn instructions(phenotype: &Phenotype) -> Vec<String> {
        Self::render(phenotype)
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect()
    }
}
