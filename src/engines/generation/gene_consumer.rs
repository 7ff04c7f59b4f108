use crate::error::{QgenError, Result};

/// Deterministically consumes codons from a genome, wrapping to the start when
/// the end is reached
pub struct GenomeReader<'a> {
    genome: &'a [u32],
    position: usize,
    wraps: usize,
    consumed: usize,
}

impl<'a> GenomeReader<'a> {
    pub fn new(genome: &'a [u32]) -> Result<Self> {
        if genome.is_empty() {
            return Err(QgenError::InvalidGenome("genome is empty".to_string()));
        }
        Ok(Self {
            genome,
            position: 0,
            wraps: 0,
            consumed: 0,
        })
    }

    /// Every codon must be strictly below `bound`
    pub fn with_bound(genome: &'a [u32], bound: u32) -> Result<Self> {
        if let Some((i, codon)) = genome.iter().enumerate().find(|(_, c)| **c >= bound) {
            return Err(QgenError::InvalidGenome(format!(
                "codon {} at position {} is outside 0..{}",
                codon, i, bound
            )));
        }
        Self::new(genome)
    }

    /// Return the codon under the cursor and advance. Reaching the end moves
    /// the cursor back to 0 and counts one wrap.
    pub fn next_codon(&mut self) -> u32 {
        let codon = self.genome[self.position];
        self.position += 1;
        self.consumed += 1;
        if self.position == self.genome.len() {
            self.position = 0;
            self.wraps += 1;
        }
        codon
    }

    /// Read one codon and reduce it to an index into `alternatives` choices.
    /// Returns the codon too, for tracing. `alternatives` must be non-zero.
    pub fn choose(&mut self, alternatives: usize) -> (u32, usize) {
        let codon = self.next_codon();
        (codon, codon as usize % alternatives)
    }

    pub fn wraps_used(&self) -> usize {
        self.wraps
    }

    /// Times an earlier codon was actually read again
    pub fn reuses(&self) -> usize {
        self.consumed.saturating_sub(1) / self.genome.len()
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Distinct genome positions read so far
    pub fn effective_length(&self) -> usize {
        self.consumed.min(self.genome.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_genome_rejected() {
        assert!(matches!(
            GenomeReader::new(&[]),
            Err(QgenError::InvalidGenome(_))
        ));
    }

    #[test]
    fn test_wraps_after_last_codon() {
        let genome = [4, 5];
        let mut reader = GenomeReader::new(&genome).unwrap();
        assert_eq!(reader.next_codon(), 4);
        assert_eq!(reader.wraps_used(), 0);
        assert_eq!(reader.next_codon(), 5);
        assert_eq!(reader.wraps_used(), 1);
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.next_codon(), 4);
        assert_eq!(reader.consumed(), 3);
        assert_eq!(reader.effective_length(), 2);
    }

    #[test]
    fn test_choose_reduces_codon_modulo_alternatives() {
        let genome = [7, 9];
        let mut reader = GenomeReader::new(&genome).unwrap();
        assert_eq!(reader.choose(3), (7, 1));
        assert_eq!(reader.choose(1), (9, 0));
        assert_eq!(reader.consumed(), 2);
    }

    #[test]
    fn test_out_of_bound_codon_rejected() {
        assert!(GenomeReader::with_bound(&[1, 256], 256).is_err());
        assert!(GenomeReader::with_bound(&[1, 255], 256).is_ok());
    }
}
