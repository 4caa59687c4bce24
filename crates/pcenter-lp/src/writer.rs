//! Streaming writer for the CPLEX-style LP text format.
//!
//! Sections must be opened in document order: objective, `Subject To`,
//! `Bounds`, `Binaries`, `End`. Writing a line outside its section, or
//! reopening an earlier section, fails with `ErrorKind::InvalidInput`.

use std::io::{self, Write};

use crate::problem::{Bound, Constraint, LpProblem, Objective, Sense, Term};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Section {
    Preamble,
    Objective,
    Constraints,
    Bounds,
    Binaries,
    Done,
}

pub struct LpWriter<W: Write> {
    out: W,
    section: Section,
    lines: usize,
}

impl<W: Write> LpWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            section: Section::Preamble,
            lines: 0,
        }
    }

    /// Number of lines written so far
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// `\ text` comment line; only allowed before the objective
    pub fn comment(&mut self, text: &str) -> io::Result<()> {
        self.require(Section::Preamble, "comment")?;
        for line in text.lines() {
            self.line(format_args!("\\ {}", line))?;
        }
        Ok(())
    }

    pub fn objective(&mut self, objective: &Objective) -> io::Result<()> {
        self.enter(Section::Objective)?;
        let header = match objective.sense {
            Sense::Minimize => "Minimize",
            Sense::Maximize => "Maximize",
        };
        self.line(format_args!("{}", header))?;
        self.line(format_args!(" {}: {}", objective.name, fmt_terms(&objective.terms)))
    }

    pub fn begin_constraints(&mut self) -> io::Result<()> {
        self.enter(Section::Constraints)?;
        self.line(format_args!("Subject To"))
    }

    pub fn constraint(&mut self, constraint: &Constraint) -> io::Result<()> {
        self.require(Section::Constraints, "constraint")?;
        self.line(format_args!(
            " {}: {} {} {}",
            constraint.name,
            fmt_terms(&constraint.terms),
            constraint.op.symbol(),
            fmt_num(constraint.rhs)
        ))
    }

    pub fn begin_bounds(&mut self) -> io::Result<()> {
        self.enter(Section::Bounds)?;
        self.line(format_args!("Bounds"))
    }

    pub fn bound(&mut self, bound: &Bound) -> io::Result<()> {
        self.require(Section::Bounds, "bound")?;
        self.line(format_args!(
            " {} <= {} <= {}",
            fmt_num(bound.lower),
            bound.variable,
            fmt_num(bound.upper)
        ))
    }

    pub fn begin_binaries(&mut self) -> io::Result<()> {
        self.enter(Section::Binaries)?;
        self.line(format_args!("Binaries"))
    }

    pub fn binary(&mut self, variable: &str) -> io::Result<()> {
        self.require(Section::Binaries, "binary declaration")?;
        self.line(format_args!(" {}", variable))
    }

    /// Writes `End`, flushes and hands back the underlying writer
    pub fn end(mut self) -> io::Result<W> {
        if self.section < Section::Objective {
            return Err(out_of_order("End before objective"));
        }
        self.section = Section::Done;
        self.line(format_args!("End"))?;
        self.out.flush()?;
        Ok(self.out)
    }

    fn enter(&mut self, next: Section) -> io::Result<()> {
        if self.section >= next {
            return Err(out_of_order(&format!("{:?} section opened after {:?}", next, self.section)));
        }
        if next > Section::Objective && self.section < Section::Objective {
            return Err(out_of_order(&format!("{:?} section opened before objective", next)));
        }
        self.section = next;
        Ok(())
    }

    fn require(&self, section: Section, what: &str) -> io::Result<()> {
        if self.section != section {
            return Err(out_of_order(&format!("{} written in {:?} section", what, self.section)));
        }
        Ok(())
    }

    fn line(&mut self, args: std::fmt::Arguments<'_>) -> io::Result<()> {
        self.out.write_fmt(args)?;
        self.out.write_all(b"\n")?;
        self.lines += 1;
        Ok(())
    }
}

fn out_of_order(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, msg.to_string())
}

impl LpProblem {
    /// Write the whole document to `out`
    pub fn write_to<W: Write>(&self, out: W) -> io::Result<W> {
        let mut w = LpWriter::new(out);
        if let Some(title) = &self.title {
            w.comment(title)?;
        }
        w.objective(&self.objective)?;
        w.begin_constraints()?;
        for c in &self.constraints {
            w.constraint(c)?;
        }
        w.begin_bounds()?;
        for b in &self.bounds {
            w.bound(b)?;
        }
        w.begin_binaries()?;
        for b in &self.binaries {
            w.binary(b)?;
        }
        w.end()
    }

    pub fn to_lp_string(&self) -> io::Result<String> {
        let buf = self.write_to(Vec::new())?;
        String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

/// Integral values print without a fractional part; others use the shortest
/// representation that reads back to the same `f64`.
pub fn fmt_num(v: f64) -> String {
    if v.is_infinite() {
        return if v > 0.0 { "+inf".to_string() } else { "-inf".to_string() };
    }
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

/// `x + y`, `- x + y`, `-6000 y2 + 1000 x1_2`. Zero coefficients are kept so
/// every variable of the block stays visible to the solver.
pub fn fmt_terms(terms: &[Term]) -> String {
    if terms.is_empty() {
        return "0".to_string();
    }
    let mut out = String::new();
    for (k, t) in terms.iter().enumerate() {
        let c = t.coefficient;
        let negative = c < 0.0;
        let magnitude = c.abs();
        if k == 0 {
            if magnitude == 1.0 {
                if negative {
                    out.push_str("- ");
                }
            } else {
                out.push_str(&fmt_num(c));
                out.push(' ');
            }
        } else {
            out.push_str(if negative { " - " } else { " + " });
            if magnitude != 1.0 {
                out.push_str(&fmt_num(magnitude));
                out.push(' ');
            }
        }
        out.push_str(&t.variable);
    }
    out
}
