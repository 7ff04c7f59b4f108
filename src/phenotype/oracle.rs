//! Oracle regions and their substitution.
//!
//! A region is the run of tokens strictly between an [`ORACLE_BEGIN`] token
//! and the next [`ORACLE_END`] token. Sentinels are matched as whole tokens,
//! never as substrings, so a literal that merely contains the marker text
//! cannot open or close a region.

use super::model::Phenotype;
use super::renderer::Renderer;
use crate::error::{QgenError, Result};
use std::ops::Range;

pub const ORACLE_BEGIN: &str = "# BEGIN ORACLE\n";
pub const ORACLE_END: &str = "# END ORACLE\n";

/// Body ranges of every region, in order. Zero regions is not an error here;
/// unbalanced or nested markers are.
pub(crate) fn scan_regions(tokens: &[String]) -> Result<Vec<Range<usize>>> {
    let mut regions = Vec::new();
    let mut open: Option<usize> = None;

    for (i, token) in tokens.iter().enumerate() {
        if token == ORACLE_BEGIN {
            if open.is_some() {
                return Err(QgenError::SentinelNotFound(format!(
                    "oracle begin marker at token {} while a region is already open",
                    i
                )));
            }
            open = Some(i + 1);
        } else if token == ORACLE_END {
            let start = open.take().ok_or_else(|| {
                QgenError::SentinelNotFound(format!(
                    "oracle end marker at token {} without a begin marker",
                    i
                ))
            })?;
            regions.push(start..i);
        }
    }

    if open.is_some() {
        let begins = tokens.iter().filter(|t| *t == ORACLE_BEGIN).count();
        let ends = tokens.iter().filter(|t| *t == ORACLE_END).count();
        return Err(QgenError::SentinelNotFound(format!(
            "{} oracle begin markers but {} end markers",
            begins, ends
        )));
    }

    Ok(regions)
}

fn require_regions(tokens: &[String]) -> Result<Vec<Range<usize>>> {
    let regions = scan_regions(tokens)?;
    if regions.is_empty() {
        return Err(QgenError::SentinelNotFound(
            "no oracle region in phenotype".to_string(),
        ));
    }
    Ok(regions)
}

/// One instruction line as a token; `None` for blank lines. A line may not
/// span several lines or be a sentinel itself.
fn instruction_token(line: &str) -> Result<Option<String>> {
    let line = line.strip_suffix('\n').unwrap_or(line);
    if line.contains('\n') {
        return Err(QgenError::Validation(format!(
            "oracle instruction {:?} spans more than one line",
            line
        )));
    }
    if line.trim().is_empty() {
        return Ok(None);
    }
    let token = format!("{}\n", line);
    if token == ORACLE_BEGIN || token == ORACLE_END {
        return Err(QgenError::Validation(format!(
            "oracle instruction {:?} is a sentinel",
            line
        )));
    }
    Ok(Some(token))
}

fn substitute_tokens(tokens: &[String], oracle: &[String]) -> Result<Vec<String>> {
    let regions = require_regions(tokens)?;
    let mut replacement = Vec::with_capacity(oracle.len());
    for line in oracle {
        if let Some(token) = instruction_token(line)? {
            replacement.push(token);
        }
    }

    let mut out = Vec::with_capacity(tokens.len() + regions.len() * replacement.len());
    let mut cursor = 0;
    for region in regions {
        out.extend_from_slice(&tokens[cursor..region.start]);
        out.extend(replacement.iter().cloned());
        cursor = region.end;
    }
    out.extend_from_slice(&tokens[cursor..]);
    Ok(out)
}

fn extract_tokens(tokens: &[String]) -> Result<Vec<Vec<String>>> {
    Ok(require_regions(tokens)?
        .into_iter()
        .map(|region| {
            Renderer::render_tokens(&tokens[region])
                .lines()
                .filter(|l| !l.trim().is_empty())
                .map(str::to_string)
                .collect()
        })
        .collect())
}

impl Phenotype {
    /// Token ranges strictly between each begin/end pair
    pub fn oracle_regions(&self) -> Result<Vec<Range<usize>>> {
        require_regions(self.tokens())
    }

    /// Replace the body of every oracle region with `oracle`, one token per
    /// instruction line. Blank lines are dropped. Sentinels and everything
    /// outside the regions are kept in place. An instruction that is itself a
    /// sentinel or holds an embedded newline is a `Validation` error.
    pub fn substitute_oracle(&self, oracle: &[String]) -> Result<Phenotype> {
        let tokens = substitute_tokens(self.tokens(), oracle)?;
        Ok(Phenotype::new(tokens, *self.stats()))
    }

    /// Instruction lines of each oracle region
    pub fn extract_oracles(&self) -> Result<Vec<Vec<String>>> {
        extract_tokens(self.tokens())
    }
}

fn line_tokens(text: &str) -> Vec<String> {
    text.lines().map(|l| format!("{}\n", l)).collect()
}

/// Text form of [`Phenotype::substitute_oracle`]: sentinels must occupy whole
/// lines. The result always ends with a newline.
pub fn substitute_oracle_text(text: &str, oracle: &[String]) -> Result<String> {
    let tokens = substitute_tokens(&line_tokens(text), oracle)?;
    Ok(Renderer::render_tokens(&tokens))
}

pub fn extract_oracle_text(text: &str) -> Result<Vec<Vec<String>>> {
    extract_tokens(&line_tokens(text))
}
