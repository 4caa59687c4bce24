//! Reader for the LP dialect produced by [`LpWriter`](crate::LpWriter).
//!
//! Supports the objective, `Subject To`, `Bounds`, `Binaries` and `End`
//! sections, `\` comments, labelled or unlabelled constraints spanning any
//! number of lines, and the bound forms `l <= x <= u`, `x <= u`, `x >= l`,
//! `x = v` and `x free`.

use thiserror::Error;

use crate::lexer::{Lexer, Span, Token, TokenKind};
use crate::problem::{Bound, Constraint, ConstraintOp, LpProblem, Objective, Sense, Term};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected token: expected {expected}, found {found:?} at position {span:?}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },
    #[error("Unexpected end of file")]
    UnexpectedEof,
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
    #[error("Missing objective section")]
    MissingObjective,
    #[error("Unsupported section: {0}")]
    UnsupportedSection(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Minimize,
    Maximize,
    SubjectTo,
    Bounds,
    Binaries,
    Generals,
    End,
}

pub struct Reader {
    tokens: Vec<Token>,
    pos: usize,
}

impl Reader {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn parse(source: &str) -> Result<LpProblem, ParseError> {
        let tokens = Lexer::tokenize(source);
        let mut reader = Reader::new(tokens);
        reader.parse_problem()
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> TokenKind {
        self.current().map(|t| t.kind).unwrap_or(TokenKind::Eof)
    }

    fn peek_kind_at(&self, offset: usize) -> TokenKind {
        self.tokens.get(self.pos + offset).map(|t| t.kind).unwrap_or(TokenKind::Eof)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn skip_trivia(&mut self) {
        while matches!(self.peek_kind(), TokenKind::Newline | TokenKind::Comment) {
            self.pos += 1;
        }
    }

    /// True when only comments separate the current token from a line break
    fn at_line_start(&self) -> bool {
        self.tokens[..self.pos.min(self.tokens.len())]
            .iter()
            .rev()
            .find(|t| t.kind != TokenKind::Comment)
            .is_none_or(|t| t.kind == TokenKind::Newline)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.current() {
            Some(t) if t.kind != TokenKind::Eof => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: t.text.clone(),
                span: t.span,
            },
            _ => ParseError::UnexpectedEof,
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ParseError> {
        self.skip_trivia();
        if self.peek_kind() == kind {
            self.advance().ok_or(ParseError::UnexpectedEof)
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Section keyword at the current position. Keywords only count at the
    /// start of a line, so variables may share their names.
    fn keyword(&self) -> Option<(Keyword, usize)> {
        if !self.at_line_start() {
            return None;
        }
        let token = self.current()?;
        if token.kind != TokenKind::Ident {
            return None;
        }
        let word = token.text.to_ascii_lowercase();
        let kw = match word.as_str() {
            "minimize" | "minimise" | "minimum" | "min" => (Keyword::Minimize, 1),
            "maximize" | "maximise" | "maximum" | "max" => (Keyword::Maximize, 1),
            "st" | "s.t." | "st." => (Keyword::SubjectTo, 1),
            "subject" | "such" => {
                let next = self.tokens.get(self.pos + 1)?;
                let follow = next.text.to_ascii_lowercase();
                if next.kind == TokenKind::Ident && (follow == "to" || follow == "that") {
                    (Keyword::SubjectTo, 2)
                } else {
                    return None;
                }
            }
            "bounds" | "bound" => (Keyword::Bounds, 1),
            "binaries" | "binary" | "bin" => (Keyword::Binaries, 1),
            "generals" | "general" | "gen" | "semi-continuous" | "semis" | "semi" | "sos" => {
                (Keyword::Generals, 1)
            }
            "end" => (Keyword::End, 1),
            _ => return None,
        };
        Some(kw)
    }

    fn parse_problem(&mut self) -> Result<LpProblem, ParseError> {
        let title = self.leading_comment();

        self.skip_trivia();
        let sense = match self.keyword() {
            Some((Keyword::Minimize, len)) => {
                self.pos += len;
                Sense::Minimize
            }
            Some((Keyword::Maximize, len)) => {
                self.pos += len;
                Sense::Maximize
            }
            _ => return Err(ParseError::MissingObjective),
        };

        let (name, terms) = self.parse_objective_body()?;
        let mut problem = LpProblem::new(Objective { name, sense, terms });
        problem.title = title;

        loop {
            self.skip_trivia();
            if self.peek_kind() == TokenKind::Eof {
                break;
            }
            let Some((kw, len)) = self.keyword() else {
                return Err(self.unexpected("section keyword"));
            };
            let keyword_text = self.current().map(|t| t.text.clone()).unwrap_or_default();
            self.pos += len;
            match kw {
                Keyword::SubjectTo => self.parse_constraints(&mut problem)?,
                Keyword::Bounds => self.parse_bounds(&mut problem)?,
                Keyword::Binaries => self.parse_binaries(&mut problem)?,
                Keyword::End => break,
                Keyword::Generals | Keyword::Minimize | Keyword::Maximize => {
                    return Err(ParseError::UnsupportedSection(keyword_text));
                }
            }
        }

        Ok(problem)
    }

    fn leading_comment(&self) -> Option<String> {
        let token = self.tokens.first()?;
        if token.kind != TokenKind::Comment {
            return None;
        }
        let text = token.text.trim_start_matches('\\').trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    fn at_section_boundary(&mut self) -> bool {
        self.skip_trivia();
        self.peek_kind() == TokenKind::Eof || self.keyword().is_some()
    }

    fn parse_objective_body(&mut self) -> Result<(String, Vec<Term>), ParseError> {
        if self.at_section_boundary() {
            return Ok(("obj".to_string(), Vec::new()));
        }
        let name = self.parse_label().unwrap_or_else(|| "obj".to_string());
        let mut terms = Vec::new();
        while !self.at_section_boundary() {
            terms.push(self.parse_term(terms.is_empty())?);
        }
        Ok((name, terms))
    }

    /// `name:` prefix, if present
    fn parse_label(&mut self) -> Option<String> {
        if self.peek_kind() == TokenKind::Ident && self.peek_kind_at(1) == TokenKind::Colon {
            let name = self.advance()?.text;
            self.pos += 1;
            Some(name)
        } else {
            None
        }
    }

    fn parse_constraints(&mut self, problem: &mut LpProblem) -> Result<(), ParseError> {
        while !self.at_section_boundary() {
            let index = problem.constraints.len() + 1;
            let name = self.parse_label().unwrap_or_else(|| format!("R{}", index));
            let mut terms = Vec::new();
            let op = loop {
                self.skip_trivia();
                if let Some(op) = self.relation() {
                    break op;
                }
                terms.push(self.parse_term(terms.is_empty())?);
            };
            let rhs = self.parse_signed_number()?;
            problem.constraints.push(Constraint::new(name, terms, op, rhs));
        }
        Ok(())
    }

    fn parse_bounds(&mut self, problem: &mut LpProblem) -> Result<(), ParseError> {
        while !self.at_section_boundary() {
            let bound = match self.peek_kind() {
                TokenKind::Ident if !is_infinity(self.current()) => self.parse_variable_first_bound()?,
                _ => {
                    let lower = self.parse_signed_number()?;
                    self.expect(TokenKind::Le, "<=")?;
                    let variable = self.expect(TokenKind::Ident, "variable")?.text;
                    self.skip_trivia();
                    let upper = if self.peek_kind() == TokenKind::Le {
                        self.pos += 1;
                        self.parse_signed_number()?
                    } else {
                        f64::INFINITY
                    };
                    Bound::new(variable, lower, upper)
                }
            };
            problem.bounds.push(bound);
        }
        Ok(())
    }

    fn parse_variable_first_bound(&mut self) -> Result<Bound, ParseError> {
        let variable = self.expect(TokenKind::Ident, "variable")?.text;
        self.skip_trivia();
        if let Some(t) = self.current() {
            if t.kind == TokenKind::Ident && t.text.eq_ignore_ascii_case("free") {
                self.pos += 1;
                return Ok(Bound::new(variable, f64::NEG_INFINITY, f64::INFINITY));
            }
        }
        let op = self.relation().ok_or_else(|| self.unexpected("<=, >= or ="))?;
        let value = self.parse_signed_number()?;
        Ok(match op {
            ConstraintOp::Le => Bound::new(variable, 0.0, value),
            ConstraintOp::Ge => Bound::new(variable, value, f64::INFINITY),
            ConstraintOp::Eq => Bound::new(variable, value, value),
        })
    }

    fn parse_binaries(&mut self, problem: &mut LpProblem) -> Result<(), ParseError> {
        while !self.at_section_boundary() {
            let name = self.expect(TokenKind::Ident, "variable")?.text;
            problem.binaries.push(name);
        }
        Ok(())
    }

    fn relation(&mut self) -> Option<ConstraintOp> {
        let op = match self.peek_kind() {
            TokenKind::Le => ConstraintOp::Le,
            TokenKind::Ge => ConstraintOp::Ge,
            TokenKind::Eq => ConstraintOp::Eq,
            _ => return None,
        };
        self.pos += 1;
        Some(op)
    }

    /// `[+|-] [number] name`; a leading sign is optional on the first term only
    fn parse_term(&mut self, first: bool) -> Result<Term, ParseError> {
        self.skip_trivia();
        let sign = match self.peek_kind() {
            TokenKind::Plus => {
                self.pos += 1;
                1.0
            }
            TokenKind::Minus => {
                self.pos += 1;
                -1.0
            }
            _ if first => 1.0,
            _ => return Err(self.unexpected("+ or -")),
        };
        self.skip_trivia();
        let coefficient = if self.peek_kind() == TokenKind::Number {
            let token = self.advance().ok_or(ParseError::UnexpectedEof)?;
            parse_number(&token.text)?
        } else {
            1.0
        };
        let variable = self.expect(TokenKind::Ident, "variable")?.text;
        Ok(Term::new(sign * coefficient, variable))
    }

    fn parse_signed_number(&mut self) -> Result<f64, ParseError> {
        self.skip_trivia();
        let sign = match self.peek_kind() {
            TokenKind::Plus => {
                self.pos += 1;
                1.0
            }
            TokenKind::Minus => {
                self.pos += 1;
                -1.0
            }
            _ => 1.0,
        };
        self.skip_trivia();
        if is_infinity(self.current()) {
            self.pos += 1;
            return Ok(sign * f64::INFINITY);
        }
        let token = self.expect(TokenKind::Number, "number")?;
        Ok(sign * parse_number(&token.text)?)
    }
}

fn is_infinity(token: Option<&Token>) -> bool {
    token.is_some_and(|t| {
        t.kind == TokenKind::Ident
            && (t.text.eq_ignore_ascii_case("inf") || t.text.eq_ignore_ascii_case("infinity"))
    })
}

fn parse_number(text: &str) -> Result<f64, ParseError> {
    text.parse::<f64>()
        .map_err(|_| ParseError::InvalidNumber(text.to_string()))
}
