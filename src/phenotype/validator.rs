use super::oracle::scan_regions;
use crate::error::{QgenError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    Body,
    Measurement,
}

/// (angle parameters, qubit arguments) for each known gate
fn gate_signature(name: &str) -> Option<(usize, usize)> {
    match name {
        "h" | "x" | "y" | "z" | "s" | "sdg" | "t" | "tdg" | "sx" => Some((0, 1)),
        "rx" | "ry" | "rz" | "p" => Some((1, 1)),
        "cx" | "cz" | "swap" => Some((0, 2)),
        "cp" => Some((1, 2)),
        "ccx" | "cswap" => Some((0, 3)),
        _ => None,
    }
}

/// Structural checks over rendered circuit text: phase order, qubit range,
/// distinct arguments for multi-qubit gates and balanced oracle markers.
pub struct PhenotypeValidator {
    num_qubits: usize,
}

impl PhenotypeValidator {
    pub fn new(num_qubits: usize) -> Self {
        Self { num_qubits }
    }

    pub fn validate(&self, text: &str) -> Result<()> {
        let line_tokens: Vec<String> = text.lines().map(|l| format!("{}\n", l)).collect();
        scan_regions(&line_tokens).map_err(|e| QgenError::Validation(e.to_string()))?;

        let mut phase = Phase::Start;
        for (number, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fail = |message: String| {
                QgenError::Validation(format!("line {}: {} ({})", number + 1, message, line))
            };

            if phase == Phase::Start {
                self.validate_init(line).map_err(fail)?;
                phase = Phase::Body;
                continue;
            }

            let (name, args) = split_call(line)
                .ok_or_else(|| fail("not a gate instruction".to_string()))?;

            if name == "measure" {
                self.validate_measure(args).map_err(fail)?;
                phase = Phase::Measurement;
                continue;
            }
            if phase == Phase::Measurement {
                return Err(fail("gate after measurement".to_string()));
            }

            let qubits = if name == "mcx" {
                parse_qubits(&args.replace(['[', ']'], "")).map_err(fail)?
            } else {
                let (angles, arity) = gate_signature(name)
                    .ok_or_else(|| fail(format!("unknown gate '{}'", name)))?;
                let parts: Vec<&str> = args.split(',').map(str::trim).collect();
                if parts.len() != angles + arity {
                    return Err(fail(format!(
                        "expected {} arguments, found {}",
                        angles + arity,
                        parts.len()
                    )));
                }
                if parts[..angles].iter().any(|a| a.is_empty()) {
                    return Err(fail("empty angle".to_string()));
                }
                parse_qubits(&parts[angles..].join(",")).map_err(fail)?
            };
            self.validate_qubits(&qubits).map_err(fail)?;
        }

        if phase == Phase::Start {
            return Err(QgenError::Validation("missing circuit initialisation".to_string()));
        }
        Ok(())
    }

    fn validate_init(&self, line: &str) -> std::result::Result<(), String> {
        let expected = format!("qc = QuantumCircuit({}, {})", self.num_qubits, self.num_qubits);
        if line == expected {
            Ok(())
        } else {
            Err(format!("expected '{}' as first instruction", expected))
        }
    }

    fn validate_measure(&self, args: &str) -> std::result::Result<(), String> {
        let parts = parse_qubits(args)?;
        if parts.len() != 2 {
            return Err("measure takes a qubit and a classical bit".to_string());
        }
        if parts.iter().any(|&i| i >= self.num_qubits) {
            return Err("measurement index out of range".to_string());
        }
        Ok(())
    }

    fn validate_qubits(&self, qubits: &[usize]) -> std::result::Result<(), String> {
        for (i, &q) in qubits.iter().enumerate() {
            if q >= self.num_qubits {
                return Err(format!("qubit {} out of range", q));
            }
            if qubits[..i].contains(&q) {
                return Err(format!("qubit {} repeated", q));
            }
        }
        Ok(())
    }
}

/// `qc.name(args)` -> (name, args)
fn split_call(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix("qc.")?;
    let open = rest.find('(')?;
    let args = rest[open + 1..].strip_suffix(')')?;
    Some((&rest[..open], args))
}

fn parse_qubits(args: &str) -> std::result::Result<Vec<usize>, String> {
    args.split(',')
        .map(|a| {
            a.trim()
                .parse::<usize>()
                .map_err(|_| format!("'{}' is not a qubit index", a.trim()))
        })
        .collect()
}
