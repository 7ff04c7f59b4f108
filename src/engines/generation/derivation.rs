use crate::config::DecoderConfig;
use crate::engines::generation::{gene_consumer::GenomeReader, genome::Genome};
use crate::error::{OverflowReason, QgenError, Result};
use crate::grammar::{Grammar, Symbol};
use crate::phenotype::{DerivationStats, Phenotype};
use rayon::prelude::*;
use std::sync::Arc;

/// One codon-driven decision made during a derivation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub non_terminal: String,
    pub codon: u32,
    pub index: usize,
    pub alternatives: usize,
}

#[derive(Clone, Copy)]
enum Pending<'g> {
    Terminal(&'g str),
    NonTerminal(&'g str),
}

impl<'g> From<&'g Symbol> for Pending<'g> {
    fn from(symbol: &'g Symbol) -> Self {
        match symbol {
            Symbol::Terminal(literal) => Pending::Terminal(literal),
            Symbol::NonTerminal(name) => Pending::NonTerminal(name),
        }
    }
}

/// Per-decode work area; never outlives one call to `derive`
struct DerivationState<'g, 'a> {
    // Top of the stack is the leftmost pending symbol
    pending: Vec<Pending<'g>>,
    output: Vec<String>,
    reader: GenomeReader<'a>,
    expansions: usize,
}

impl DerivationState<'_, '_> {
    fn overflow(&self, reason: OverflowReason) -> QgenError {
        QgenError::DerivationOverflow {
            reason,
            codons_consumed: self.reader.consumed(),
            wraps: self.reader.wraps_used(),
            tokens: self.output.len(),
        }
    }
}

/// Leftmost derivation of a grammar's start symbol driven by genome codons.
///
/// The grammar is shared read-only, so one engine can decode many genomes,
/// in parallel if needed. Each non-terminal costs one codon; the alternative
/// taken is `codon % alternative_count`. A decode either yields a complete
/// phenotype or fails as a whole.
pub struct DerivationEngine {
    grammar: Arc<Grammar>,
    config: DecoderConfig,
}

impl DerivationEngine {
    pub fn new(grammar: Arc<Grammar>, config: DecoderConfig) -> Self {
        Self { grammar, config }
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Main entry point: map a genome to its phenotype
    pub fn decode(&self, genome: &[u32]) -> Result<Phenotype> {
        self.derive(genome, None)
    }

    /// Like [`Self::decode`], also returning every choice in derivation order
    pub fn decode_traced(&self, genome: &[u32]) -> Result<(Phenotype, Vec<Choice>)> {
        let mut trace = Vec::new();
        let phenotype = self.derive(genome, Some(&mut trace))?;
        Ok((phenotype, trace))
    }

    /// Decode independent genomes on the rayon pool; results keep input order
    pub fn decode_batch(&self, genomes: &[Genome]) -> Vec<Result<Phenotype>> {
        genomes.par_iter().map(|genome| self.decode(genome)).collect()
    }

    fn derive(&self, genome: &[u32], mut trace: Option<&mut Vec<Choice>>) -> Result<Phenotype> {
        let reader = match self.config.codon_bound {
            Some(bound) => GenomeReader::with_bound(genome, bound)?,
            None => GenomeReader::new(genome)?,
        };

        let mut state = DerivationState {
            pending: vec![Pending::NonTerminal(self.grammar.start())],
            output: Vec::new(),
            reader,
            expansions: 0,
        };

        while let Some(symbol) = state.pending.pop() {
            match symbol {
                Pending::Terminal(literal) => {
                    if state.output.len() >= self.config.max_tokens {
                        return Err(state.overflow(OverflowReason::Tokens));
                    }
                    state.output.push(literal.to_string());
                }
                Pending::NonTerminal(name) => {
                    if state.reader.wraps_used() > self.config.max_wraps {
                        return Err(state.overflow(OverflowReason::Wraps));
                    }
                    if state.expansions >= self.config.max_expansions {
                        return Err(state.overflow(OverflowReason::Expansions));
                    }

                    let alternatives = self.grammar.alternatives(name)?;
                    let (codon, index) = state.reader.choose(alternatives.len());
                    state.expansions += 1;

                    log::trace!(
                        "<{}> codon {} -> alternative {}/{}",
                        name,
                        codon,
                        index,
                        alternatives.len()
                    );
                    if let Some(trace) = trace.as_deref_mut() {
                        trace.push(Choice {
                            non_terminal: name.to_string(),
                            codon,
                            index,
                            alternatives: alternatives.len(),
                        });
                    }

                    state
                        .pending
                        .extend(alternatives[index].iter().rev().map(Pending::from));
                }
            }
        }

        let stats = DerivationStats {
            codons_consumed: state.reader.consumed(),
            wraps: state.reader.reuses(),
            expansions: state.expansions,
            effective_length: state.reader.effective_length(),
        };
        log::debug!(
            "Decoded genome of {} codons into {} tokens ({} codons read, {} wraps)",
            genome.len(),
            state.output.len(),
            stats.codons_consumed,
            stats.wraps
        );

        Ok(Phenotype::new(state.output, stats))
    }
}
