//! BNF grammar files.
//!
//! ```text
//! # comment
//! <expr> ::= <term> "+" <expr>
//!          | <term>
//! <term> ::= "x" | ""
//! ```
//!
//! Terminals are quoted with `"` or `'` and understand `\n`, `\t`, `\\` and
//! escaped quotes. An empty literal denotes the empty alternative. The first
//! rule defines the start symbol.

use super::model::{Alternative, Grammar, GrammarBuilder, Symbol};
use crate::error::{QgenError, Result};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    NonTerminal(String),
    Literal(String),
    Define,
    Bar,
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            line: 1,
        }
    }

    fn error(&self, message: impl std::fmt::Display) -> QgenError {
        QgenError::Grammar(format!("line {}: {}", self.line, message))
    }

    fn next_token(&mut self) -> Result<Option<(Token, usize)>> {
        while let Some(&c) = self.chars.peek() {
            match c {
                '\n' => {
                    self.line += 1;
                    self.chars.next();
                }
                c if c.is_whitespace() => {
                    self.chars.next();
                }
                '#' => {
                    while let Some(&c) = self.chars.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.chars.next();
                    }
                }
                '|' => {
                    self.chars.next();
                    return Ok(Some((Token::Bar, self.line)));
                }
                ':' => {
                    let line = self.line;
                    self.chars.next();
                    if self.chars.next() != Some(':') || self.chars.next() != Some('=') {
                        return Err(self.error("expected '::='"));
                    }
                    return Ok(Some((Token::Define, line)));
                }
                '<' => {
                    let line = self.line;
                    self.chars.next();
                    let mut name = String::new();
                    loop {
                        match self.chars.next() {
                            Some('>') => break,
                            Some('\n') | None => {
                                return Err(self.error("unterminated <non-terminal>"))
                            }
                            Some(c) => name.push(c),
                        }
                    }
                    if name.trim().is_empty() {
                        return Err(self.error("empty non-terminal name"));
                    }
                    return Ok(Some((Token::NonTerminal(name.trim().to_string()), line)));
                }
                '"' | '\'' => {
                    let line = self.line;
                    let literal = self.quoted(c)?;
                    return Ok(Some((Token::Literal(literal), line)));
                }
                other => return Err(self.error(format!("unexpected character '{}'", other))),
            }
        }
        Ok(None)
    }

    fn quoted(&mut self, quote: char) -> Result<String> {
        self.chars.next();
        let mut literal = String::new();
        loop {
            match self.chars.next() {
                Some(c) if c == quote => return Ok(literal),
                Some('\\') => match self.chars.next() {
                    Some('n') => literal.push('\n'),
                    Some('t') => literal.push('\t'),
                    Some(c @ ('\\' | '"' | '\'')) => literal.push(c),
                    Some(c) => return Err(self.error(format!("unknown escape '\\{}'", c))),
                    None => return Err(self.error("unterminated literal")),
                },
                Some('\n') | None => return Err(self.error("unterminated literal")),
                Some(c) => literal.push(c),
            }
        }
    }
}

/// Parse BNF text into a validated [`Grammar`]
pub fn parse_bnf(text: &str) -> Result<Grammar> {
    let mut lexer = Lexer::new(text);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }

    let mut builder = GrammarBuilder::new();
    let mut start: Option<String> = None;
    let mut current: Option<(String, Vec<Alternative>)> = None;

    let mut i = 0;
    while i < tokens.len() {
        let (token, line) = &tokens[i];
        let starts_rule = matches!(token, Token::NonTerminal(_))
            && matches!(tokens.get(i + 1), Some((Token::Define, _)));

        if starts_rule {
            if let Token::NonTerminal(name) = token {
                if let Some((done, alternatives)) = current.take() {
                    builder.insert(done, alternatives);
                }
                start.get_or_insert_with(|| name.clone());
                current = Some((name.clone(), vec![Vec::new()]));
            }
            i += 2;
            continue;
        }

        let (_, alternatives) = current.as_mut().ok_or_else(|| {
            QgenError::Grammar(format!("line {}: symbol outside of a rule", line))
        })?;

        match token {
            Token::Bar => alternatives.push(Vec::new()),
            Token::Define => {
                return Err(QgenError::Grammar(format!(
                    "line {}: '::=' must follow a non-terminal",
                    line
                )))
            }
            Token::Literal(literal) => {
                if !literal.is_empty() {
                    if let Some(last) = alternatives.last_mut() {
                        last.push(Symbol::Terminal(literal.clone()));
                    }
                }
            }
            Token::NonTerminal(name) => {
                if let Some(last) = alternatives.last_mut() {
                    last.push(Symbol::NonTerminal(name.clone()));
                }
            }
        }
        i += 1;
    }

    if let Some((done, alternatives)) = current.take() {
        builder.insert(done, alternatives);
    }

    let start = start.ok_or_else(|| QgenError::Grammar("grammar has no rules".to_string()))?;
    builder.build(start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multiline_rules() {
        let text = r#"
            # arithmetic
            <e> ::= <t> "+" <e>
                  | <t>
            <t> ::= 'x' | "y\n" | ""
        "#;
        let grammar = parse_bnf(text).unwrap();
        assert_eq!(grammar.start(), "e");
        assert_eq!(grammar.alternative_count("e").unwrap(), 2);
        assert_eq!(grammar.alternative_count("t").unwrap(), 3);
        assert_eq!(grammar.alternative_at("t", 1).unwrap(), &[Symbol::t("y\n")]);
        assert!(grammar.alternative_at("t", 2).unwrap().is_empty());
    }

    #[test]
    fn test_hash_inside_literal_is_not_comment() {
        let grammar = parse_bnf(r##"<s> ::= "# BEGIN\n""##).unwrap();
        assert_eq!(grammar.alternative_at("s", 0).unwrap(), &[Symbol::t("# BEGIN\n")]);
    }

    #[test]
    fn test_dangling_reference_is_grammar_error() {
        let err = parse_bnf("<s> ::= <missing>").unwrap_err();
        assert!(matches!(err, QgenError::Grammar(_)));
    }

    #[test]
    fn test_error_reports_line() {
        let err = parse_bnf("<s> ::= \"a\"\n<t> ::= \"unterminated").unwrap_err();
        assert!(err.to_string().contains("line 2"), "{}", err);
    }

    #[test]
    fn test_symbol_before_rule_rejected() {
        assert!(parse_bnf("\"a\" <s> ::= \"b\"").is_err());
    }

    #[test]
    fn test_display_output_parses_back() {
        let text = "<s> ::= <a> \"!\\n\" | \"\"\n<a> ::= \"q\\\"\"\n";
        let grammar = parse_bnf(text).unwrap();
        let reparsed = parse_bnf(&grammar.to_string()).unwrap();
        assert_eq!(reparsed.to_string(), grammar.to_string());
    }
}
