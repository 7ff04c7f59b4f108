use crate::config::GenomeConfig;
use crate::engines::generation::genome::Genome;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generate random genome
pub fn random_genome<R: Rng>(
    length: usize,
    codon_range: std::ops::Range<u32>,
    rng: &mut R,
) -> Genome {
    (0..length)
        .map(|_| rng.gen_range(codon_range.clone()))
        .collect()
}

/// `count` genomes shaped by `config`, reproducible when a seed is set
pub fn random_genomes(config: &GenomeConfig, count: usize) -> Vec<Genome> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    (0..count)
        .map(|_| random_genome(config.length, 0..config.codon_max, &mut rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_genomes_repeat() {
        let config = GenomeConfig {
            length: 10,
            codon_max: 8,
            seed: Some(42),
        };
        let a = random_genomes(&config, 3);
        assert_eq!(a, random_genomes(&config, 3));
        assert!(a.iter().flatten().all(|&c| c < 8));
        assert!(a.iter().all(|g| g.len() == 10));
    }
}
