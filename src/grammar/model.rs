use crate::error::{QgenError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Grammar symbol: a literal leaf or a reference to a production
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    Terminal(String),
    NonTerminal(String),
}

impl Symbol {
    pub fn t(literal: impl Into<String>) -> Self {
        Symbol::Terminal(literal.into())
    }

    pub fn nt(name: impl Into<String>) -> Self {
        Symbol::NonTerminal(name.into())
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }
}

/// One right-hand side of a production. May be empty.
pub type Alternative = Vec<Symbol>;

/// Immutable, closed context-free grammar.
///
/// Every non-terminal referenced by any alternative is defined and the start
/// symbol is present; both are checked by [`GrammarBuilder::build`], so the
/// derivation engine never sees a dangling reference.
#[derive(Debug, Clone)]
pub struct Grammar {
    start: String,
    rules: HashMap<String, Vec<Alternative>>,
    // Definition order, kept for stable BNF output
    order: Vec<String>,
}

impl Grammar {
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::new()
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Non-terminal names in definition order
    pub fn non_terminals(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn alternatives(&self, name: &str) -> Result<&[Alternative]> {
        self.rules
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| QgenError::Grammar(format!("Undefined non-terminal <{}>", name)))
    }

    pub fn alternative_count(&self, name: &str) -> Result<usize> {
        self.alternatives(name).map(<[Alternative]>::len)
    }

    /// `index` must already be reduced modulo [`Self::alternative_count`].
    pub fn alternative_at(&self, name: &str, index: usize) -> Result<&[Symbol]> {
        let alternatives = self.alternatives(name)?;
        alternatives.get(index).map(Vec::as_slice).ok_or_else(|| {
            QgenError::Grammar(format!(
                "Alternative {} out of range for <{}> ({} alternatives)",
                index,
                name,
                alternatives.len()
            ))
        })
    }

    /// Non-terminals reachable from `name`, including `name` itself
    pub fn reachable_from(&self, name: &str) -> HashSet<String> {
        let mut seen = HashSet::new();
        let mut stack = vec![name.to_string()];

        while let Some(current) = stack.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(alternatives) = self.rules.get(&current) {
                for symbol in alternatives.iter().flatten() {
                    if let Symbol::NonTerminal(next) = symbol {
                        if !seen.contains(next) {
                            stack.push(next.clone());
                        }
                    }
                }
            }
        }

        seen
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Start rule first; a BNF reader takes the first rule as the start symbol
        let rest = self.order.iter().filter(|name| **name != self.start);
        for name in std::iter::once(&self.start).chain(rest) {
            write!(f, "<{}> ::=", name)?;
            for (i, alternative) in self.rules[name].iter().enumerate() {
                if i > 0 {
                    write!(f, " |")?;
                }
                if alternative.is_empty() {
                    write!(f, " \"\"")?;
                }
                for symbol in alternative {
                    match symbol {
                        Symbol::Terminal(literal) => write!(f, " \"{}\"", escape(literal))?,
                        Symbol::NonTerminal(nt) => write!(f, " <{}>", nt)?,
                    }
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn escape(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    for c in literal.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            other => out.push(other),
        }
    }
    out
}

/// Collects productions and validates them once, eagerly, in [`Self::build`]
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    rules: HashMap<String, Vec<Alternative>>,
    order: Vec<String>,
    duplicates: Vec<String>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(mut self, name: impl Into<String>, alternatives: Vec<Alternative>) -> Self {
        self.insert(name, alternatives);
        self
    }

    /// In-place variant of [`Self::define`] for loops
    pub fn insert(&mut self, name: impl Into<String>, alternatives: Vec<Alternative>) {
        let name = name.into();
        if self.rules.contains_key(&name) {
            self.duplicates.push(name);
            return;
        }
        self.order.push(name.clone());
        self.rules.insert(name, alternatives);
    }

    pub fn build(self, start: impl Into<String>) -> Result<Grammar> {
        let start = start.into();

        if let Some(name) = self.duplicates.first() {
            return Err(QgenError::Grammar(format!(
                "Non-terminal <{}> defined more than once",
                name
            )));
        }

        for name in &self.order {
            let alternatives = &self.rules[name];
            if alternatives.is_empty() {
                return Err(QgenError::Grammar(format!(
                    "Non-terminal <{}> has no alternatives",
                    name
                )));
            }
            for symbol in alternatives.iter().flatten() {
                if let Symbol::NonTerminal(referenced) = symbol {
                    if !self.rules.contains_key(referenced) {
                        return Err(QgenError::Grammar(format!(
                            "<{}> references undefined non-terminal <{}>",
                            name, referenced
                        )));
                    }
                }
            }
        }

        if !self.rules.contains_key(&start) {
            return Err(QgenError::Grammar(format!(
                "Start symbol <{}> is not defined",
                start
            )));
        }

        Ok(Grammar {
            start,
            rules: self.rules,
            order: self.order,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> GrammarBuilder {
        GrammarBuilder::new()
            .define("s", vec![vec![Symbol::nt("a"), Symbol::t("!")], vec![]])
            .define("a", vec![vec![Symbol::t("x")], vec![Symbol::t("y")]])
    }

    #[test]
    fn test_alternative_lookup() {
        let grammar = tiny().build("s").unwrap();
        assert_eq!(grammar.alternative_count("s").unwrap(), 2);
        assert_eq!(grammar.alternative_at("a", 1).unwrap(), &[Symbol::t("y")]);
        assert!(grammar.alternative_at("s", 1).unwrap().is_empty());
    }

    #[test]
    fn test_dangling_reference_rejected() {
        let result = GrammarBuilder::new()
            .define("s", vec![vec![Symbol::nt("missing")]])
            .build("s");
        assert!(matches!(result, Err(QgenError::Grammar(_))));
    }

    #[test]
    fn test_empty_alternative_set_rejected() {
        let result = tiny().define("b", vec![]).build("s");
        assert!(matches!(result, Err(QgenError::Grammar(_))));
    }

    #[test]
    fn test_missing_start_rejected() {
        assert!(tiny().build("nope").is_err());
    }

    #[test]
    fn test_duplicate_definition_rejected() {
        let result = tiny().define("a", vec![vec![Symbol::t("z")]]).build("s");
        assert!(matches!(result, Err(QgenError::Grammar(_))));
    }

    #[test]
    fn test_reachability() {
        let grammar = tiny()
            .define("orphan", vec![vec![Symbol::t("o")]])
            .build("s")
            .unwrap();
        let reachable = grammar.reachable_from("s");
        assert!(reachable.contains("a"));
        assert!(!reachable.contains("orphan"));
    }

    #[test]
    fn test_display_escapes_literals() {
        let grammar = GrammarBuilder::new()
            .define("s", vec![vec![Symbol::t("say \"hi\"\n")]])
            .build("s")
            .unwrap();
        assert_eq!(grammar.to_string(), "<s> ::= \"say \\\"hi\\\"\\n\"\n");
    }

    #[test]
    fn test_display_puts_start_rule_first() {
        let grammar = GrammarBuilder::new()
            .define("a", vec![vec![Symbol::t("x")]])
            .define("s", vec![vec![Symbol::nt("a"), Symbol::t("y")]])
            .build("s")
            .unwrap();
        let text = grammar.to_string();
        assert!(text.starts_with("<s> ::="));

        let reparsed = crate::grammar::parse_bnf(&text).unwrap();
        assert_eq!(reparsed.start(), "s");
        assert_eq!(
            reparsed.alternative_at("s", 0).unwrap(),
            grammar.alternative_at("s", 0).unwrap()
        );
    }
}
