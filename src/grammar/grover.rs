//! Grammar for Grover-style search circuits.
//!
//! The skeleton is fixed: initialise, uniform superposition, one or more
//! iterations, measurement. No later phase can reach an earlier one. Each
//! iteration carries an oracle region delimited by sentinel terminals and a
//! diffuser whose inversion-about-mean core is not evolvable; both may be
//! followed by any number of evolved gates.

use super::catalog::{literal_alternatives, qubit_pairs, qubit_triples, ANGLE_CATALOG};
use super::model::{Alternative, Grammar, GrammarBuilder, Symbol};
use crate::config::{ConfigSection, GroverConfig};
use crate::error::Result;
use crate::phenotype::{ORACLE_BEGIN, ORACLE_END};

pub const CIRCUIT: &str = "circuit";
pub const INIT: &str = "init";
pub const SUPERPOSITION: &str = "superposition";
pub const ITERATIONS: &str = "iterations";
pub const ITERATION: &str = "iteration";
pub const ORACLE_BLOCK: &str = "oracle_block";
pub const ORACLE_REGION: &str = "oracle_region";
pub const ORACLE_BODY: &str = "oracle_body";
pub const MARKING_PATTERN: &str = "marking_pattern";
pub const DIFFUSER_BLOCK: &str = "diffuser_block";
pub const DIFFUSER_CORE: &str = "diffuser_core";
pub const EXTRA_GATES: &str = "extra_gates";
pub const GATE: &str = "gate";
pub const SINGLE_GATE: &str = "single_gate";
pub const SINGLE_NAME: &str = "single_name";
pub const TWO_QUBIT_GATE: &str = "two_qubit_gate";
pub const TWO_NAME: &str = "two_name";
pub const THREE_QUBIT_GATE: &str = "three_qubit_gate";
pub const THREE_NAME: &str = "three_name";
pub const ROTATION_GATE: &str = "rotation_gate";
pub const ROTATION_NAME: &str = "rotation_name";
pub const QUBIT: &str = "qubit";
pub const QUBIT_PAIR: &str = "qubit_pair";
pub const QUBIT_TRIPLE: &str = "qubit_triple";
pub const ANGLE: &str = "angle";
pub const MEASUREMENT: &str = "measurement";

const SINGLE_GATES: &[&str] = &["h", "x", "y", "z", "s", "sdg", "t", "tdg"];
const TWO_QUBIT_GATES: &[&str] = &["cx", "cz", "swap"];
const THREE_QUBIT_GATES: &[&str] = &["ccx", "cswap"];
const ROTATION_GATES: &[&str] = &["rx", "ry", "rz", "p"];

pub struct GroverGrammar;

impl GroverGrammar {
    pub fn new(config: &GroverConfig) -> Result<Grammar> {
        config.validate()?;
        let n = config.num_qubits;
        let mut b = GrammarBuilder::new();

        b.insert(
            CIRCUIT,
            vec![vec![
                Symbol::nt(INIT),
                Symbol::nt(SUPERPOSITION),
                Symbol::nt(ITERATIONS),
                Symbol::nt(MEASUREMENT),
            ]],
        );
        b.insert(
            INIT,
            vec![vec![Symbol::t(format!("qc = QuantumCircuit({}, {})\n", n, n))]],
        );
        b.insert(SUPERPOSITION, vec![lines(hadamard_layer(n))]);
        b.insert(
            ITERATIONS,
            vec![
                vec![Symbol::nt(ITERATION)],
                vec![Symbol::nt(ITERATION), Symbol::nt(ITERATIONS)],
            ],
        );
        // Unpaired blocks are deliberately allowed; the paired form comes
        // first so the all-zero genome yields the canonical iteration.
        b.insert(
            ITERATION,
            vec![
                vec![Symbol::nt(ORACLE_BLOCK), Symbol::nt(DIFFUSER_BLOCK)],
                vec![Symbol::nt(ORACLE_BLOCK)],
                vec![Symbol::nt(DIFFUSER_BLOCK)],
            ],
        );

        b.insert(
            ORACLE_BLOCK,
            vec![vec![Symbol::nt(ORACLE_REGION), Symbol::nt(EXTRA_GATES)]],
        );
        b.insert(
            ORACLE_REGION,
            vec![vec![
                Symbol::t(ORACLE_BEGIN),
                Symbol::nt(ORACLE_BODY),
                Symbol::t(ORACLE_END),
            ]],
        );
        b.insert(ORACLE_BODY, vec![vec![], vec![Symbol::nt(MARKING_PATTERN)]]);
        b.insert(
            MARKING_PATTERN,
            (0..(1u32 << n)).map(|state| lines(marking_pattern(n, state))).collect(),
        );

        b.insert(
            DIFFUSER_BLOCK,
            vec![vec![Symbol::nt(DIFFUSER_CORE), Symbol::nt(EXTRA_GATES)]],
        );
        b.insert(DIFFUSER_CORE, vec![lines(diffuser_core(n))]);

        b.insert(
            EXTRA_GATES,
            vec![vec![], vec![Symbol::nt(GATE), Symbol::nt(EXTRA_GATES)]],
        );

        let mut gates = vec![
            vec![Symbol::nt(SINGLE_GATE)],
            vec![Symbol::nt(TWO_QUBIT_GATE)],
        ];
        if n >= 3 {
            gates.push(vec![Symbol::nt(THREE_QUBIT_GATE)]);
        }
        gates.push(vec![Symbol::nt(ROTATION_GATE)]);
        b.insert(GATE, gates);

        b.insert(
            SINGLE_GATE,
            vec![call(SINGLE_NAME, vec![Symbol::nt(QUBIT)])],
        );
        b.insert(SINGLE_NAME, literal_alternatives(SINGLE_GATES));

        b.insert(
            TWO_QUBIT_GATE,
            vec![
                call(TWO_NAME, vec![Symbol::nt(QUBIT_PAIR)]),
                vec![
                    Symbol::t("qc.cp("),
                    Symbol::nt(ANGLE),
                    Symbol::t(", "),
                    Symbol::nt(QUBIT_PAIR),
                    Symbol::t(")\n"),
                ],
            ],
        );
        b.insert(TWO_NAME, literal_alternatives(TWO_QUBIT_GATES));

        if n >= 3 {
            b.insert(
                THREE_QUBIT_GATE,
                vec![call(THREE_NAME, vec![Symbol::nt(QUBIT_TRIPLE)])],
            );
            b.insert(THREE_NAME, literal_alternatives(THREE_QUBIT_GATES));
            b.insert(QUBIT_TRIPLE, literal_alternatives(&qubit_triples(n)));
        }

        b.insert(
            ROTATION_GATE,
            vec![call(
                ROTATION_NAME,
                vec![Symbol::nt(ANGLE), Symbol::t(", "), Symbol::nt(QUBIT)],
            )],
        );
        b.insert(ROTATION_NAME, literal_alternatives(ROTATION_GATES));

        let qubits: Vec<String> = (0..n).map(|q| q.to_string()).collect();
        b.insert(QUBIT, literal_alternatives(&qubits));
        b.insert(QUBIT_PAIR, literal_alternatives(&qubit_pairs(n)));
        b.insert(ANGLE, literal_alternatives(ANGLE_CATALOG));

        b.insert(
            MEASUREMENT,
            vec![lines((0..n).map(|q| format!("qc.measure({}, {})", q, q)).collect())],
        );

        b.build(CIRCUIT)
    }
}

/// `qc.<name>(<args>)\n` with the gate name drawn from `name_rule`
fn call(name_rule: &str, args: Vec<Symbol>) -> Alternative {
    let mut alternative = vec![Symbol::t("qc."), Symbol::nt(name_rule), Symbol::t("(")];
    alternative.extend(args);
    alternative.push(Symbol::t(")\n"));
    alternative
}

fn lines(instructions: Vec<String>) -> Alternative {
    instructions
        .into_iter()
        .map(|line| Symbol::Terminal(format!("{}\n", line)))
        .collect()
}

fn hadamard_layer(n: usize) -> Vec<String> {
    (0..n).map(|q| format!("qc.h({})", q)).collect()
}

fn x_layer(qubits: impl Iterator<Item = usize>) -> Vec<String> {
    qubits.map(|q| format!("qc.x({})", q)).collect()
}

/// X on the last qubit controlled by all others
fn multi_controlled_x(n: usize) -> String {
    match n {
        2 => "qc.cx(0,1)".to_string(),
        3 => "qc.ccx(0,1,2)".to_string(),
        _ => {
            let controls: Vec<String> = (0..n - 1).map(|q| q.to_string()).collect();
            format!("qc.mcx([{}], {})", controls.join(", "), n - 1)
        }
    }
}

/// Phase flip on every qubit being |1>, conjugated by H on the target
fn controlled_phase_flip(n: usize) -> Vec<String> {
    let target = n - 1;
    vec![
        format!("qc.h({})", target),
        multi_controlled_x(n),
        format!("qc.h({})", target),
    ]
}

/// Inversion about the mean
pub fn diffuser_core(n: usize) -> Vec<String> {
    let mut out = hadamard_layer(n);
    out.extend(x_layer(0..n));
    out.extend(controlled_phase_flip(n));
    out.extend(x_layer(0..n));
    out.extend(hadamard_layer(n));
    out
}

/// Phase-marks basis state `state`; bit `i` of `state` is qubit `i`
pub fn marking_pattern(n: usize, state: u32) -> Vec<String> {
    let zeros: Vec<usize> = (0..n).filter(|q| state & (1 << q) == 0).collect();
    let mut out = x_layer(zeros.iter().copied());
    out.extend(controlled_phase_flip(n));
    out.extend(x_layer(zeros.iter().copied()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grammar(n: usize) -> Grammar {
        GroverGrammar::new(&GroverConfig { num_qubits: n }).unwrap()
    }

    #[test]
    fn test_diffuser_core_three_qubits() {
        let core = diffuser_core(3);
        assert_eq!(core.len(), 15);
        assert_eq!(core[7], "qc.ccx(0,1,2)");
    }

    #[test]
    fn test_marking_all_ones_has_no_x() {
        let pattern = marking_pattern(3, 0b111);
        assert_eq!(pattern, vec!["qc.h(2)", "qc.ccx(0,1,2)", "qc.h(2)"]);
    }

    #[test]
    fn test_marking_zero_flips_every_qubit() {
        let pattern = marking_pattern(3, 0);
        assert_eq!(pattern.iter().filter(|l| l.starts_with("qc.x(")).count(), 6);
    }

    #[test]
    fn test_two_qubit_grammar_has_no_triples() {
        let g = grammar(2);
        assert!(!g.contains(THREE_QUBIT_GATE));
        assert_eq!(g.alternative_count(GATE).unwrap(), 3);
        assert_eq!(g.alternative_count(MARKING_PATTERN).unwrap(), 4);
    }

    #[test]
    fn test_large_register_uses_mcx() {
        assert_eq!(multi_controlled_x(4), "qc.mcx([0, 1, 2], 3)");
        assert!(grammar(4).contains(QUBIT_TRIPLE));
    }

    #[test]
    fn test_unsupported_size_rejected() {
        assert!(GroverGrammar::new(&GroverConfig { num_qubits: 1 }).is_err());
    }
}
