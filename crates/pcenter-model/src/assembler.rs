use std::io::Write;

use pcenter_lp::{LpProblem, LpWriter, Objective, Term};
use tracing::{debug, info};

use crate::constraints::{ConstraintFamily, FIRST_LABEL};
use crate::declarations::{
    assignment_binaries, assignment_bounds, facility_binaries, facility_bounds,
};
use crate::error::GenerateError;
use crate::instance::Instance;
use crate::variables::Var;

pub const DEFAULT_TITLE: &str = "Capacitated p-Center Facility Location Problem";

#[derive(Debug, Clone, PartialEq)]
pub struct ModelOptions {
    /// Leading comment line; `None` writes no comment
    pub title: Option<String>,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            title: Some(DEFAULT_TITLE.to_string()),
        }
    }
}

/// Counts describing a written (or inspected) model
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModelStats {
    pub n: usize,
    pub p: usize,
    pub constraints: usize,
    pub assignment_bounds: usize,
    pub facility_bounds: usize,
    pub assignment_binaries: usize,
    pub facility_binaries: usize,
}

impl ModelStats {
    /// What a model for `n` nodes and facility count `p` contains
    pub fn expected(n: usize, p: usize) -> Self {
        Self {
            n,
            p,
            constraints: ConstraintFamily::total(n),
            assignment_bounds: n * n,
            facility_bounds: n,
            assignment_binaries: n * n,
            facility_binaries: n,
        }
    }
}

/// Builds the LP document for one instance.
///
/// Sections are written in the order `Minimize`, `Subject To` (assignment,
/// facility count, opening, capacity, max cost), `Bounds`, `Binaries`, `End`.
/// The assembler owns the constraint counter and threads it through the
/// generators.
pub struct Assembler<'a> {
    instance: &'a Instance,
    options: ModelOptions,
}

impl<'a> Assembler<'a> {
    pub fn new(instance: &'a Instance) -> Self {
        Self {
            instance,
            options: ModelOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ModelOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.options.title = title;
        self
    }

    fn objective() -> Objective {
        Objective::minimize(vec![Term::unit(Var::MaxCost.to_string())])
    }

    /// Stream the document into `out`
    pub fn write_to<W: Write>(&self, out: W) -> Result<ModelStats, GenerateError> {
        let n = self.instance.n();
        let mut stats = ModelStats {
            n,
            p: self.instance.p(),
            ..ModelStats::default()
        };
        let mut w = LpWriter::new(out);

        if let Some(title) = &self.options.title {
            w.comment(title)?;
        }
        w.objective(&Self::objective())?;

        w.begin_constraints()?;
        let mut next = FIRST_LABEL;
        for family in ConstraintFamily::ORDER {
            let block = family.generate(self.instance, next);
            debug!(
                family = family.name(),
                first = block.first_label(),
                count = block.len(),
                "writing constraint block"
            );
            next = block.next_label();
            for constraint in block {
                w.constraint(&constraint)?;
                stats.constraints += 1;
            }
        }

        w.begin_bounds()?;
        for bound in assignment_bounds(self.instance) {
            w.bound(&bound)?;
            stats.assignment_bounds += 1;
        }
        for bound in facility_bounds(self.instance) {
            w.bound(&bound)?;
            stats.facility_bounds += 1;
        }

        w.begin_binaries()?;
        for var in assignment_binaries(self.instance) {
            w.binary(&var)?;
            stats.assignment_binaries += 1;
        }
        for var in facility_binaries(self.instance) {
            w.binary(&var)?;
            stats.facility_binaries += 1;
        }

        let lines = w.lines() + 1;
        w.end()?;

        info!(
            n = stats.n,
            p = stats.p,
            constraints = stats.constraints,
            lines,
            "p-center model written"
        );
        Ok(stats)
    }

    pub fn to_lp_string(&self) -> Result<String, GenerateError> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        String::from_utf8(buf)
            .map_err(|e| GenerateError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }

    /// The same model held in memory
    pub fn to_problem(&self) -> LpProblem {
        let mut lp = LpProblem::new(Self::objective());
        lp.title = self.options.title.clone();

        let mut next = FIRST_LABEL;
        for family in ConstraintFamily::ORDER {
            let block = family.generate(self.instance, next);
            next = block.next_label();
            lp.constraints.extend(block);
        }
        lp.bounds.extend(assignment_bounds(self.instance));
        lp.bounds.extend(facility_bounds(self.instance));
        lp.binaries.extend(assignment_binaries(self.instance));
        lp.binaries.extend(facility_binaries(self.instance));
        lp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::tests::four_node;
    use pcenter_lp::{ConstraintOp, Reader};

    #[test]
    fn test_four_node_document() {
        let inst = four_node();
        let text = Assembler::new(&inst).to_lp_string().unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "\\ Capacitated p-Center Facility Location Problem");
        assert_eq!(lines[1], "Minimize");
        assert_eq!(lines[2], " obj: W");
        assert_eq!(lines[3], "Subject To");
        assert_eq!(lines[4], " c1: x1_1 + x1_2 + x1_3 + x1_4 = 1");
        assert_eq!(lines[8], " c5: y1 + y2 + y3 + y4 <= 1");
        assert_eq!(lines[9], " c6: - x1_1 + y1 >= 0");
        assert!(lines.contains(&" c23: -6000 y2 + 1000 x1_2 + 1200 x2_2 + 1400 x3_2 + 1350 x4_2 <= 0"));
        assert!(lines.contains(&" c22: 0 y1 + 1000 x1_1 + 1200 x2_1 + 1400 x3_1 + 1350 x4_1 <= 0"));
        assert!(lines.contains(&" c26: 0 x1_1 + 13 x1_2 + 8 x1_3 + 15 x1_4 - W <= 0"));
        assert_eq!(*lines.last().unwrap(), "End");

        let section = |name: &str| lines.iter().position(|l| *l == name).unwrap();
        let (st, bounds, binaries, end) =
            (section("Subject To"), section("Bounds"), section("Binaries"), section("End"));
        assert_eq!(bounds - st - 1, 29);
        assert_eq!(binaries - bounds - 1, 20);
        assert_eq!(end - binaries - 1, 20);
        assert_eq!(lines[bounds + 1], " 0 <= x1_1 <= 1");
        assert_eq!(lines[bounds + 17], " 0 <= y1 <= 1");
        assert_eq!(lines[binaries + 1], " x1_1");
        assert_eq!(lines[binaries + 17], " y1");
    }

    #[test]
    fn test_stats() {
        let inst = four_node();
        let stats = Assembler::new(&inst).write_to(std::io::sink()).unwrap();
        assert_eq!(stats, ModelStats::expected(4, 1));
        assert_eq!(stats.constraints, 29);
        assert_eq!(stats.assignment_bounds, 16);
        assert_eq!(stats.facility_bounds, 4);
        assert_eq!(stats.assignment_binaries, 16);
        assert_eq!(stats.facility_binaries, 4);
    }

    #[test]
    fn test_problem_matches_text() {
        let inst = four_node();
        let asm = Assembler::new(&inst);
        let parsed = Reader::parse(&asm.to_lp_string().unwrap()).unwrap();
        assert_eq!(parsed, asm.to_problem());
    }

    #[test]
    fn test_labels_unique_and_contiguous() {
        for n in 1..=6 {
            let cost: Vec<Vec<f64>> = (0..n)
                .map(|i| (0..n).map(|j| (i as f64 - j as f64).abs()).collect())
                .collect();
            let inst = Instance::new(cost, vec![1.0; n], vec![n as f64; n], 1).unwrap();
            let lp = Assembler::new(&inst).to_problem();

            let names: Vec<String> = lp.constraints.iter().map(|c| c.name.clone()).collect();
            let expected: Vec<String> = (1..=n + 1 + n * n + n + n).map(|k| format!("c{}", k)).collect();
            assert_eq!(names, expected);
        }
    }

    #[test]
    fn test_single_node_model() {
        let inst = Instance::new(vec![vec![0.0]], vec![3.0], vec![4.0], 1).unwrap();
        let lp = Assembler::new(&inst).to_problem();

        assert_eq!(lp.num_constraints(), 5);
        let c1 = lp.constraint("c1").unwrap();
        assert_eq!((c1.terms.len(), c1.op, c1.rhs), (1, ConstraintOp::Eq, 1.0));
        let c2 = lp.constraint("c2").unwrap();
        assert_eq!((c2.coefficient("y1"), c2.op, c2.rhs), (Some(1.0), ConstraintOp::Le, 1.0));
        let c3 = lp.constraint("c3").unwrap();
        assert_eq!(c3.coefficient("x1_1"), Some(-1.0));
        let c4 = lp.constraint("c4").unwrap();
        assert_eq!(c4.coefficient("y1"), Some(-4.0));
        assert_eq!(c4.coefficient("x1_1"), Some(3.0));
        let c5 = lp.constraint("c5").unwrap();
        assert_eq!(c5.coefficient("W"), Some(-1.0));
        assert_eq!(lp.bounds.len(), 2);
        assert_eq!(lp.binaries, vec!["x1_1".to_string(), "y1".to_string()]);
    }

    #[test]
    fn test_without_title() {
        let inst = four_node();
        let text = Assembler::new(&inst).with_title(None).to_lp_string().unwrap();
        assert!(text.starts_with("Minimize\n"));
    }

    #[test]
    fn test_fractional_coefficients() {
        let inst = Instance::new(
            vec![vec![0.0, 2.75], vec![2.75, 0.0]],
            vec![10.5, 3.0],
            vec![20.25, 0.0],
            1,
        )
        .unwrap();
        let text = Assembler::new(&inst).to_lp_string().unwrap();
        assert!(text.contains(" c8: -20.25 y1 + 10.5 x1_1 + 3 x2_1 <= 0\n"));
        assert!(text.contains(" c10: 0 x1_1 + 2.75 x1_2 - W <= 0\n"));
    }
}
