use std::collections::BTreeSet;

/// Direction of the objective
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

/// A single `coefficient variable` pair of a linear expression
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub coefficient: f64,
    pub variable: String,
}

impl Term {
    pub fn new(coefficient: f64, variable: impl Into<String>) -> Self {
        Self {
            coefficient,
            variable: variable.into(),
        }
    }

    /// Term with coefficient 1
    pub fn unit(variable: impl Into<String>) -> Self {
        Self::new(1.0, variable)
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    /// Label written before the expression (`obj` by default)
    pub name: String,
    pub sense: Sense,
    pub terms: Vec<Term>,
}

impl Objective {
    pub fn minimize(terms: Vec<Term>) -> Self {
        Self {
            name: "obj".to_string(),
            sense: Sense::Minimize,
            terms,
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Label, unique within a problem
    pub name: String,
    /// Left-hand side, in emission order
    pub terms: Vec<Term>,
    /// Comparison operator
    pub op: ConstraintOp,
    /// Right-hand side value
    pub rhs: f64,
}

impl Constraint {
    pub fn new(name: impl Into<String>, terms: Vec<Term>, op: ConstraintOp, rhs: f64) -> Self {
        Self {
            name: name.into(),
            terms,
            op,
            rhs,
        }
    }

    /// Summed coefficient of `variable`, or `None` if it does not appear
    pub fn coefficient(&self, variable: &str) -> Option<f64> {
        self.terms
            .iter()
            .filter(|t| t.variable == variable)
            .map(|t| t.coefficient)
            .reduce(|a, b| a + b)
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    /// Less than or equal (<=)
    Le,
    /// Greater than or equal (>=)
    Ge,
    /// Equal (=)
    Eq,
}

impl ConstraintOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ConstraintOp::Le => "<=",
            ConstraintOp::Ge => ">=",
            ConstraintOp::Eq => "=",
        }
    }
}

/// `lower <= variable <= upper`; infinite values mean unbounded on that side
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Bound {
    pub variable: String,
    pub lower: f64,
    pub upper: f64,
}

impl Bound {
    pub fn new(variable: impl Into<String>, lower: f64, upper: f64) -> Self {
        Self {
            variable: variable.into(),
            lower,
            upper,
        }
    }
}

/// An LP document held in memory
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LpProblem {
    /// Written as a leading comment line
    pub title: Option<String>,
    pub objective: Objective,
    pub constraints: Vec<Constraint>,
    pub bounds: Vec<Bound>,
    pub binaries: Vec<String>,
}

impl LpProblem {
    pub fn new(objective: Objective) -> Self {
        Self {
            title: None,
            objective,
            constraints: Vec::new(),
            bounds: Vec::new(),
            binaries: Vec::new(),
        }
    }

    pub fn add_constraint(&mut self, name: impl Into<String>, terms: Vec<Term>, op: ConstraintOp, rhs: f64) {
        self.constraints.push(Constraint::new(name, terms, op, rhs));
    }

    pub fn add_bound(&mut self, variable: impl Into<String>, lower: f64, upper: f64) {
        self.bounds.push(Bound::new(variable, lower, upper));
    }

    pub fn add_binary(&mut self, variable: impl Into<String>) {
        self.binaries.push(variable.into());
    }

    pub fn constraint(&self, name: &str) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.name == name)
    }

    pub fn bound(&self, variable: &str) -> Option<&Bound> {
        self.bounds.iter().find(|b| b.variable == variable)
    }

    pub fn is_binary(&self, variable: &str) -> bool {
        self.binaries.iter().any(|b| b == variable)
    }

    /// Distinct variable names referenced anywhere in the document
    pub fn variables(&self) -> BTreeSet<&str> {
        let mut vars: BTreeSet<&str> = BTreeSet::new();
        vars.extend(self.objective.terms.iter().map(|t| t.variable.as_str()));
        for c in &self.constraints {
            vars.extend(c.terms.iter().map(|t| t.variable.as_str()));
        }
        vars.extend(self.bounds.iter().map(|b| b.variable.as_str()));
        vars.extend(self.binaries.iter().map(String::as_str));
        vars
    }

    pub fn num_variables(&self) -> usize {
        self.variables().len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }
}
