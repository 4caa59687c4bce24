pub mod lexer;
mod problem;
mod reader;
mod writer;

pub use problem::{Bound, Constraint, ConstraintOp, LpProblem, Objective, Sense, Term};
pub use reader::{ParseError, Reader};
pub use writer::{fmt_num, fmt_terms, LpWriter};
