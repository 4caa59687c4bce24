use pcenter_lp::{ConstraintOp, LpProblem, Reader};

use crate::assembler::ModelStats;
use crate::constraints::ConstraintFamily;
use crate::error::InspectError;
use crate::variables::Var;

/// Parse an LP document and recover the model dimensions
pub fn inspect_lp(source: &str) -> Result<ModelStats, InspectError> {
    let lp = Reader::parse(source)?;
    recover_stats(&lp)
}

/// Recover `n` and `p` from a p-center model and check every section count
/// against them.
///
/// `n` is the number of `y` binaries; `p` is the right-hand side of the
/// facility-count constraint, the first label after the `n` assignment rows.
pub fn recover_stats(lp: &LpProblem) -> Result<ModelStats, InspectError> {
    let mut stats = ModelStats::default();
    for name in &lp.binaries {
        match Var::parse(name) {
            Some(Var::Assign { .. }) => stats.assignment_binaries += 1,
            Some(Var::Site(_)) => stats.facility_binaries += 1,
            _ => return Err(inconsistent(format!("unexpected binary variable {}", name))),
        }
    }
    for bound in &lp.bounds {
        match Var::parse(&bound.variable) {
            Some(Var::Assign { .. }) => stats.assignment_bounds += 1,
            Some(Var::Site(_)) => stats.facility_bounds += 1,
            _ => return Err(inconsistent(format!("unexpected bound on {}", bound.variable))),
        }
    }

    let n = stats.facility_binaries;
    if n == 0 {
        return Err(inconsistent("no facility variables declared".to_string()));
    }
    stats.n = n;
    stats.constraints = lp.num_constraints();

    for (k, c) in lp.constraints.iter().enumerate() {
        let expected = format!("c{}", k + 1);
        if c.name != expected {
            return Err(inconsistent(format!(
                "constraint {} found where {} was expected",
                c.name, expected
            )));
        }
    }

    let label = format!("c{}", ConstraintFamily::FacilityCount.first_label(n));
    let count = lp
        .constraint(&label)
        .ok_or_else(|| inconsistent(format!("missing facility-count constraint {}", label)))?;
    let sites_only = count.terms.len() == n
        && count
            .terms
            .iter()
            .all(|t| t.coefficient == 1.0 && matches!(Var::parse(&t.variable), Some(Var::Site(_))));
    if count.op != ConstraintOp::Le || !sites_only {
        return Err(inconsistent(format!("{} is not a facility-count constraint", label)));
    }
    if count.rhs.fract() != 0.0 || count.rhs < 1.0 || count.rhs > n as f64 {
        return Err(inconsistent(format!("facility count {} outside 1..={}", count.rhs, n)));
    }
    stats.p = count.rhs as usize;

    let expected = ModelStats::expected(n, stats.p);
    if stats != expected {
        return Err(inconsistent(format!(
            "counts {:?} do not match a model with n = {}, p = {}",
            stats, n, stats.p
        )));
    }
    Ok(stats)
}

fn inconsistent(msg: String) -> InspectError {
    InspectError::Inconsistent(msg)
}
