use qgen::config::{DecoderConfig, GroverConfig};
use qgen::engines::generation::{random_genome, DerivationEngine};
use qgen::grammar::grover::diffuser_core;
use qgen::grammar::GroverGrammar;
use qgen::phenotype::{
    extract_oracle_text, substitute_oracle_text, Phenotype, PhenotypeValidator, Renderer,
};
use qgen::QgenError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

fn engine() -> DerivationEngine {
    let grammar = GroverGrammar::new(&GroverConfig::default()).unwrap();
    DerivationEngine::new(Arc::new(grammar), DecoderConfig::default())
}

fn oracle_lines() -> Vec<String> {
    ["qc.x(0)", "qc.h(2)", "qc.ccx(0,1,2)", "qc.h(2)", "qc.x(0)"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn canonical() -> Phenotype {
    engine().decode(&[0; 20]).unwrap()
}

#[test]
fn test_five_instruction_oracle_between_markers() {
    let substituted = canonical().substitute_oracle(&oracle_lines()).unwrap();
    let lines = Renderer::instructions(&substituted);

    let begin = lines.iter().position(|l| l == "# BEGIN ORACLE").unwrap();
    let end = lines.iter().position(|l| l == "# END ORACLE").unwrap();
    assert_eq!(&lines[begin + 1..end], oracle_lines().as_slice());

    let core = diffuser_core(3);
    assert_eq!(&lines[end + 1..end + 1 + core.len()], core.as_slice());
    assert_eq!(lines.len(), 24 + 5);

    PhenotypeValidator::new(3)
        .validate(&Renderer::render(&substituted))
        .unwrap();
}

#[test]
fn test_substitute_then_extract_round_trip() {
    let engine = engine();
    let mut rng = StdRng::seed_from_u64(11);
    let mut checked = 0;

    for _ in 0..300 {
        let genome = random_genome(60, 0..256, &mut rng);
        let Ok(phenotype) = engine.decode(&genome) else {
            continue;
        };
        let Ok(regions) = phenotype.oracle_regions() else {
            continue;
        };
        if regions.len() != 1 {
            continue;
        }
        let substituted = phenotype.substitute_oracle(&oracle_lines()).unwrap();
        assert_eq!(substituted.extract_oracles().unwrap(), vec![oracle_lines()]);
        checked += 1;
    }
    assert!(checked > 0);
}

#[test]
fn test_every_region_replaced() {
    let mut genome = vec![0u32; 24];
    genome[3] = 1; // two iterations
    let phenotype = engine().decode(&genome).unwrap();
    assert_eq!(phenotype.oracle_regions().unwrap().len(), 2);

    let substituted = phenotype.substitute_oracle(&oracle_lines()).unwrap();
    assert_eq!(
        substituted.extract_oracles().unwrap(),
        vec![oracle_lines(), oracle_lines()]
    );
    assert_eq!(substituted.stats(), phenotype.stats());
}

#[test]
fn test_substitution_replaces_canned_pattern() {
    let mut genome = vec![0u32; 20];
    genome[7] = 1;
    let phenotype = engine().decode(&genome).unwrap();
    assert!(!phenotype.extract_oracles().unwrap()[0].is_empty());

    let substituted = phenotype.substitute_oracle(&["qc.z(1)".to_string()]).unwrap();
    assert_eq!(
        substituted.extract_oracles().unwrap(),
        vec![vec!["qc.z(1)".to_string()]]
    );
}

#[test]
fn test_missing_region_is_sentinel_error() {
    let mut genome = vec![0u32; 20];
    genome[4] = 2; // diffuser-only iteration
    let phenotype = engine().decode(&genome).unwrap();
    assert!(matches!(
        phenotype.substitute_oracle(&oracle_lines()),
        Err(QgenError::SentinelNotFound(_))
    ));
}

#[test]
fn test_text_round_trip_on_rendered_phenotype() {
    let text = Renderer::render(&canonical());
    let substituted = substitute_oracle_text(&text, &oracle_lines()).unwrap();
    assert_eq!(extract_oracle_text(&substituted).unwrap(), vec![oracle_lines()]);
    assert_eq!(
        substituted,
        Renderer::render(&canonical().substitute_oracle(&oracle_lines()).unwrap())
    );
}

#[test]
fn test_text_with_mismatched_markers_rejected() {
    let text = "qc = QuantumCircuit(3, 3)\n# BEGIN ORACLE\n# BEGIN ORACLE\n# END ORACLE\n";
    assert!(matches!(
        substitute_oracle_text(text, &oracle_lines()),
        Err(QgenError::SentinelNotFound(_))
    ));
}

#[test]
fn test_oracle_containing_marker_leaves_phenotype_untouched() {
    let phenotype = canonical();
    let mut oracle = oracle_lines();
    oracle.push("# END ORACLE".to_string());

    let err = phenotype.substitute_oracle(&oracle).unwrap_err();
    assert!(matches!(err, QgenError::Validation(_)));
    assert_eq!(phenotype.extract_oracles().unwrap(), vec![Vec::<String>::new()]);
}

#[test]
fn test_extract_returns_exactly_what_was_substituted() {
    let joined = vec!["qc.x(0)\nqc.x(1)".to_string()];
    assert!(canonical().substitute_oracle(&joined).is_err());

    let split = vec!["qc.x(0)".to_string(), "qc.x(1)".to_string()];
    let substituted = canonical().substitute_oracle(&split).unwrap();
    assert_eq!(substituted.extract_oracles().unwrap(), vec![split]);
}
