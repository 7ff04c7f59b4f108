/// Genome representation for grammatical evolution
///
/// A genome is a sequence of codons that deterministically maps to a circuit
/// program. The derivation engine reads one codon per non-terminal it expands
/// and picks alternative `codon % alternative_count`.
///
/// Evolutionary operators work directly on this flat list: crossover is slice
/// swapping and mutation is replacing single codons. Every genome decodes to a
/// well-formed program or to an overflow, never to an invalid program.
///
/// # Conversion
///
/// Use `DerivationEngine::decode()` to convert Genome -> Phenotype
///
/// # Example
///
/// ```
/// let genome: qgen::Genome = vec![0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 3];
/// // Against the Grover grammar the 9th codon opens an extra gate and the
/// // 13th picks the qubit pair "1,2", giving `qc.cx(1,2)` after the oracle.
/// ```
pub type Genome = Vec<u32>;
