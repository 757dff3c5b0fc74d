use crate::index::IndexReader;
use crate::{ops, DocId};
use anyhow::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Word(String),
    And,
    Or,
    Not,
    LParen,
    RParen,
}

/// Character-level scanner for the query language. Words are runs of ASCII
/// alphanumerics or `_`, folded to lowercase. `&&`, `|`, `||`, `!` and
/// parentheses are operators; a lone `&` and every other character carry
/// no meaning and are skipped.
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self { chars: input.chars().collect(), pos: 0 }
    }

    fn next_token(&mut self) -> Option<Token> {
        while self.pos < self.chars.len() {
            let c = self.chars[self.pos];
            self.pos += 1;
            match c {
                '(' => return Some(Token::LParen),
                ')' => return Some(Token::RParen),
                '!' => return Some(Token::Not),
                '&' => {
                    if self.chars.get(self.pos) == Some(&'&') {
                        self.pos += 1;
                        return Some(Token::And);
                    }
                }
                '|' => {
                    if self.chars.get(self.pos) == Some(&'|') {
                        self.pos += 1;
                    }
                    return Some(Token::Or);
                }
                c if c.is_ascii_alphanumeric() || c == '_' => {
                    let mut word = String::new();
                    word.push(c.to_ascii_lowercase());
                    while let Some(&n) = self.chars.get(self.pos) {
                        if n.is_ascii_alphanumeric() || n == '_' {
                            word.push(n.to_ascii_lowercase());
                            self.pos += 1;
                        } else {
                            break;
                        }
                    }
                    return Some(Token::Word(word));
                }
                _ => {}
            }
        }
        None
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

/// Recursive-descent evaluator that produces the ascending id set directly
/// from the token stream, with no retained syntax tree. `|` binds loosest,
/// the AND forms (`&&`, infix `!`, adjacency) sit in the middle, prefix `!`
/// and parentheses bind tightest. Parsing is lenient: an unmatched `)`
/// stops consumption, a missing operand reads as the empty set.
pub struct QueryEngine<'a> {
    index: &'a IndexReader,
    universe: Option<u32>,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> QueryEngine<'a> {
    pub fn new(index: &'a IndexReader) -> Self {
        Self { index, universe: None, tokens: Vec::new(), pos: 0 }
    }

    /// Makes prefix `!` evaluate against the whole corpus. Without this the
    /// operand is parsed and discarded and the factor is the empty set.
    pub fn with_complement(mut self) -> Self {
        self.universe = Some(self.index.doc_count());
        self
    }

    pub fn eval(&mut self, query: &str) -> Result<Vec<DocId>> {
        self.tokens = Lexer::new(query).collect();
        self.pos = 0;
        self.expression()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    // expression := term (('|' '|'?) term)*
    fn expression(&mut self) -> Result<Vec<DocId>> {
        let mut acc = self.term()?;
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            let rhs = self.term()?;
            acc = ops::union(&acc, &rhs);
        }
        Ok(acc)
    }

    // term := factor (('&&' | '!' | adjacency) factor)*
    fn term(&mut self) -> Result<Vec<DocId>> {
        let mut acc = self.factor()?;
        loop {
            match self.peek() {
                Some(Token::And) => {
                    self.pos += 1;
                    let rhs = self.factor()?;
                    acc = ops::intersect(&acc, &rhs);
                }
                Some(Token::Not) => {
                    self.pos += 1;
                    let rhs = self.factor()?;
                    acc = ops::exclude(&acc, &rhs);
                }
                Some(Token::Word(_)) | Some(Token::LParen) => {
                    let rhs = self.factor()?;
                    acc = ops::intersect(&acc, &rhs);
                }
                _ => break,
            }
        }
        Ok(acc)
    }

    // factor := '!' factor | '(' expression ')' | WORD
    fn factor(&mut self) -> Result<Vec<DocId>> {
        match self.peek().cloned() {
            Some(Token::Not) => {
                self.pos += 1;
                let matched = self.factor()?;
                Ok(self.complement(&matched))
            }
            Some(Token::LParen) => {
                self.pos += 1;
                let inner = self.expression()?;
                if self.peek() == Some(&Token::RParen) {
                    self.pos += 1;
                }
                Ok(inner)
            }
            Some(Token::Word(word)) => {
                self.pos += 1;
                self.index.postings(&word)
            }
            // missing operand: empty set, nothing consumed
            _ => Ok(Vec::new()),
        }
    }

    fn complement(&self, matched: &[DocId]) -> Vec<DocId> {
        match self.universe {
            Some(n) => {
                let all: Vec<DocId> = (0..n).collect();
                ops::exclude(&all, matched)
            }
            None => Vec::new(),
        }
    }
}
