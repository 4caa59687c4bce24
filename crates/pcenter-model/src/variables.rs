//! Decision variable naming.
//!
//! Every block uses one convention: `x<client>_<facility>` is the assignment
//! of client `client` to facility site `facility`, `y<facility>` opens site
//! `facility`, and `W` is the maximum assignment cost. Indices in names are
//! 1-based.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Var {
    /// `x[client][facility]`, binary
    Assign { client: usize, facility: usize },
    /// `y[facility]`, binary
    Site(usize),
    /// `W`, continuous
    MaxCost,
}

impl Var {
    pub fn assign(client: usize, facility: usize) -> Self {
        Var::Assign { client, facility }
    }

    /// Inverse of `Display`; `None` for names outside the convention
    pub fn parse(name: &str) -> Option<Var> {
        if name == "W" {
            return Some(Var::MaxCost);
        }
        if let Some(rest) = name.strip_prefix('x') {
            let (client, facility) = rest.split_once('_')?;
            return Some(Var::Assign {
                client: parse_index(client)?,
                facility: parse_index(facility)?,
            });
        }
        if let Some(rest) = name.strip_prefix('y') {
            return Some(Var::Site(parse_index(rest)?));
        }
        None
    }
}

fn parse_index(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok().filter(|&i| i >= 1)
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Var::Assign { client, facility } => write!(f, "x{}_{}", client, facility),
            Var::Site(facility) => write!(f, "y{}", facility),
            Var::MaxCost => f.write_str("W"),
        }
    }
}
