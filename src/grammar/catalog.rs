//! Pre-enumerated argument tables.
//!
//! Gate slots draw their arguments from these lists, so a repeated qubit in a
//! multi-qubit gate has no derivation at all.

use super::model::{Alternative, Symbol};

/// Angle literals offered to rotation slots. Finite, so phenotypes stay
/// comparable for duplicate detection.
pub const ANGLE_CATALOG: &[&str] = &[
    "pi",
    "pi/2",
    "pi/4",
    "pi/8",
    "3*pi/4",
    "-pi/2",
    "-pi/4",
    "pi/3",
    "2*pi/3",
    "0.1",
    "0.5",
    "1.234",
];

/// All ordered k-tuples of distinct elements, in lexicographic order of
/// positions in `indices`
pub fn permutations(indices: &[u32], k: usize) -> Vec<Vec<u32>> {
    let mut out = Vec::new();
    if k > indices.len() {
        return out;
    }
    let mut current = Vec::with_capacity(k);
    let mut used = vec![false; indices.len()];
    permute(indices, k, &mut used, &mut current, &mut out);
    out
}

fn permute(
    indices: &[u32],
    k: usize,
    used: &mut [bool],
    current: &mut Vec<u32>,
    out: &mut Vec<Vec<u32>>,
) {
    if current.len() == k {
        out.push(current.clone());
        return;
    }
    for i in 0..indices.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        current.push(indices[i]);
        permute(indices, k, used, current, out);
        current.pop();
        used[i] = false;
    }
}

pub fn qubit_indices(num_qubits: usize) -> Vec<u32> {
    (0..num_qubits as u32).collect()
}

/// `"a,b"` for every ordered pair of distinct qubits
pub fn qubit_pairs(num_qubits: usize) -> Vec<String> {
    render_tuples(&permutations(&qubit_indices(num_qubits), 2))
}

/// `"a,b,c"` for every ordered triple of distinct qubits
pub fn qubit_triples(num_qubits: usize) -> Vec<String> {
    render_tuples(&permutations(&qubit_indices(num_qubits), 3))
}

fn render_tuples(tuples: &[Vec<u32>]) -> Vec<String> {
    tuples
        .iter()
        .map(|t| {
            t.iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect()
}

/// One single-terminal alternative per literal
pub fn literal_alternatives<S: AsRef<str>>(literals: &[S]) -> Vec<Alternative> {
    literals
        .iter()
        .map(|l| vec![Symbol::t(l.as_ref())])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_catalog_order() {
        assert_eq!(
            qubit_pairs(3),
            vec!["0,1", "0,2", "1,0", "1,2", "2,0", "2,1"]
        );
    }

    #[test]
    fn test_triples_are_distinct() {
        let triples = permutations(&qubit_indices(4), 3);
        assert_eq!(triples.len(), 24);
        for t in &triples {
            assert!(t[0] != t[1] && t[0] != t[2] && t[1] != t[2]);
        }
    }

    #[test]
    fn test_oversized_k_is_empty() {
        assert!(qubit_triples(2).is_empty());
    }

    #[test]
    fn test_angle_catalog_has_no_duplicates() {
        let mut seen = std::collections::HashSet::new();
        assert!(ANGLE_CATALOG.iter().all(|a| seen.insert(*a)));
    }
}
