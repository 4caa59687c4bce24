//! Bounds and binary declarations for the `x` and `y` families.
//!
//! Both variable families are declared binary, so the `0 <= v <= 1` bounds
//! are redundant for the solver; LP files for this model carry them anyway.
//! `W` gets neither and keeps the solver's default bounds.

use pcenter_lp::Bound;

use crate::instance::Instance;
use crate::variables::Var;

/// Every `x[i][j]`, client-major
pub fn assignment_variables(instance: &Instance) -> impl Iterator<Item = Var> {
    let n = instance.n();
    (1..=n).flat_map(move |client| (1..=n).map(move |facility| Var::assign(client, facility)))
}

/// Every `y[j]`
pub fn facility_variables(instance: &Instance) -> impl Iterator<Item = Var> {
    (1..=instance.n()).map(Var::Site)
}

/// `0 <= x[i][j] <= 1`
pub fn assignment_bounds(instance: &Instance) -> impl Iterator<Item = Bound> {
    assignment_variables(instance).map(unit_interval)
}

/// `0 <= y[j] <= 1`
pub fn facility_bounds(instance: &Instance) -> impl Iterator<Item = Bound> {
    facility_variables(instance).map(unit_interval)
}

fn unit_interval(var: Var) -> Bound {
    Bound::new(var.to_string(), 0.0, 1.0)
}

/// Binary declaration listing all `x` variables
pub fn assignment_binaries(instance: &Instance) -> impl Iterator<Item = String> {
    assignment_variables(instance).map(|v| v.to_string())
}

/// Binary declaration listing all `y` variables
pub fn facility_binaries(instance: &Instance) -> impl Iterator<Item = String> {
    facility_variables(instance).map(|v| v.to_string())
}
