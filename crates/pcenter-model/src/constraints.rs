//! The five constraint families of the capacitated p-center model.
//!
//! Labels `c1..cN` run over all families in [`ConstraintFamily::ORDER`]
//! without gaps. Each generator takes the first label of its block and the
//! returned [`Block`] reports the label the next block starts at, so the
//! caller threads one counter through every call.

use pcenter_lp::{Constraint, ConstraintOp, Term};

use crate::instance::Instance;
use crate::variables::Var;

/// Label of the first constraint in a document
pub const FIRST_LABEL: usize = 1;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintFamily {
    /// Each client is served by exactly one facility
    Assignment,
    /// At most `p` facilities are sited
    FacilityCount,
    /// A client may only use an open facility
    Opening,
    /// Demand routed to a facility stays within its capacity
    Capacity,
    /// `W` bounds every client's assignment cost
    MaxCost,
}

impl ConstraintFamily {
    /// Emission order; label offsets depend on it
    pub const ORDER: [ConstraintFamily; 5] = [
        ConstraintFamily::Assignment,
        ConstraintFamily::FacilityCount,
        ConstraintFamily::Opening,
        ConstraintFamily::Capacity,
        ConstraintFamily::MaxCost,
    ];

    /// Number of constraints this family has for `n` nodes
    pub fn len(self, n: usize) -> usize {
        match self {
            ConstraintFamily::Assignment => n,
            ConstraintFamily::FacilityCount => 1,
            ConstraintFamily::Opening => n * n,
            ConstraintFamily::Capacity => n,
            ConstraintFamily::MaxCost => n,
        }
    }

    /// Label of this family's first constraint: one past the sizes of every
    /// family emitted before it
    pub fn first_label(self, n: usize) -> usize {
        FIRST_LABEL
            + Self::ORDER
                .iter()
                .take_while(|&&f| f != self)
                .map(|f| f.len(n))
                .sum::<usize>()
    }

    /// `n + 1 + n² + n + n`
    pub fn total(n: usize) -> usize {
        Self::ORDER.iter().map(|f| f.len(n)).sum()
    }

    pub fn name(self) -> &'static str {
        match self {
            ConstraintFamily::Assignment => "assignment",
            ConstraintFamily::FacilityCount => "facility count",
            ConstraintFamily::Opening => "opening",
            ConstraintFamily::Capacity => "capacity",
            ConstraintFamily::MaxCost => "max cost",
        }
    }

    /// Run this family's generator
    pub fn generate(self, instance: &Instance, first: usize) -> Block<'_> {
        match self {
            ConstraintFamily::Assignment => assignment_constraints(instance, first),
            ConstraintFamily::FacilityCount => facility_count_constraint(instance, first),
            ConstraintFamily::Opening => opening_constraints(instance, first),
            ConstraintFamily::Capacity => capacity_constraints(instance, first),
            ConstraintFamily::MaxCost => max_cost_constraints(instance, first),
        }
    }
}

/// Left-hand side, relation and right-hand side of one unlabelled constraint
pub type Row = (Vec<Term>, ConstraintOp, f64);

/// Lazily generated constraints of one family, labelled from `first_label`
pub struct Block<'a> {
    family: ConstraintFamily,
    first: usize,
    len: usize,
    emitted: usize,
    rows: Box<dyn Iterator<Item = Row> + 'a>,
}

impl<'a> Block<'a> {
    fn new(
        family: ConstraintFamily,
        instance: &Instance,
        first: usize,
        rows: impl Iterator<Item = Row> + 'a,
    ) -> Self {
        Self {
            family,
            first,
            len: family.len(instance.n()),
            emitted: 0,
            rows: Box::new(rows),
        }
    }

    pub fn family(&self) -> ConstraintFamily {
        self.family
    }

    pub fn first_label(&self) -> usize {
        self.first
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Label the following block starts at
    pub fn next_label(&self) -> usize {
        self.first + self.len
    }
}

impl Iterator for Block<'_> {
    type Item = Constraint;

    fn next(&mut self) -> Option<Constraint> {
        let (terms, op, rhs) = self.rows.next()?;
        let label = self.first + self.emitted;
        self.emitted += 1;
        Some(Constraint::new(format!("c{}", label), terms, op, rhs))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.len - self.emitted;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Block<'_> {}

fn term(coefficient: f64, var: Var) -> Term {
    Term::new(coefficient, var.to_string())
}

/// `Σ_j x[i][j] = 1` for every client `i`
pub fn assignment_constraints(instance: &Instance, first: usize) -> Block<'_> {
    let n = instance.n();
    let rows = (1..=n).map(move |client| {
        let terms = (1..=n)
            .map(|facility| term(1.0, Var::assign(client, facility)))
            .collect();
        (terms, ConstraintOp::Eq, 1.0)
    });
    Block::new(ConstraintFamily::Assignment, instance, first, rows)
}

/// `Σ_j y[j] <= p`
pub fn facility_count_constraint(instance: &Instance, first: usize) -> Block<'_> {
    let n = instance.n();
    let p = instance.p() as f64;
    let terms = (1..=n).map(|facility| term(1.0, Var::Site(facility))).collect();
    let rows = std::iter::once((terms, ConstraintOp::Le, p));
    Block::new(ConstraintFamily::FacilityCount, instance, first, rows)
}

/// `-x[i][j] + y[j] >= 0` for every pair, facility-major: the constraint for
/// client `i` and facility `j` is labelled `first + (j-1)·n + (i-1)`
pub fn opening_constraints(instance: &Instance, first: usize) -> Block<'_> {
    let n = instance.n();
    let rows = (1..=n).flat_map(move |facility| {
        (1..=n).map(move |client| {
            let terms = vec![
                term(-1.0, Var::assign(client, facility)),
                term(1.0, Var::Site(facility)),
            ];
            (terms, ConstraintOp::Ge, 0.0)
        })
    });
    Block::new(ConstraintFamily::Opening, instance, first, rows)
}

/// `-capacity[j]·y[j] + Σ_i demand[i]·x[i][j] <= 0` for every facility `j`.
/// A zero capacity leaves `y[j]` with a zero coefficient, which keeps every
/// positive-demand client off that site.
pub fn capacity_constraints(instance: &Instance, first: usize) -> Block<'_> {
    let n = instance.n();
    let rows = (1..=n).map(move |facility| {
        let mut terms = Vec::with_capacity(n + 1);
        terms.push(term(-instance.capacity()[facility - 1], Var::Site(facility)));
        terms.extend(
            instance
                .demand()
                .iter()
                .enumerate()
                .map(|(i, &d)| term(d, Var::assign(i + 1, facility))),
        );
        (terms, ConstraintOp::Le, 0.0)
    });
    Block::new(ConstraintFamily::Capacity, instance, first, rows)
}

/// `Σ_j cost[i][j]·x[i][j] - W <= 0` for every client `i`
pub fn max_cost_constraints(instance: &Instance, first: usize) -> Block<'_> {
    let n = instance.n();
    let rows = (1..=n).map(move |client| {
        let mut terms: Vec<Term> = instance.cost_matrix()[client - 1]
            .iter()
            .enumerate()
            .map(|(j, &c)| term(c, Var::assign(client, j + 1)))
            .collect();
        terms.push(term(-1.0, Var::MaxCost));
        (terms, ConstraintOp::Le, 0.0)
    });
    Block::new(ConstraintFamily::MaxCost, instance, first, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::tests::four_node;

    fn labels(block: Block<'_>) -> Vec<String> {
        block.map(|c| c.name).collect()
    }

    #[test]
    fn test_block_offsets() {
        assert_eq!(ConstraintFamily::Assignment.first_label(4), 1);
        assert_eq!(ConstraintFamily::FacilityCount.first_label(4), 5);
        assert_eq!(ConstraintFamily::Opening.first_label(4), 6);
        assert_eq!(ConstraintFamily::Capacity.first_label(4), 22);
        assert_eq!(ConstraintFamily::MaxCost.first_label(4), 26);
        assert_eq!(ConstraintFamily::total(4), 29);

        assert_eq!(ConstraintFamily::MaxCost.first_label(7), 7 + 1 + 49 + 7 + 1);
        assert_eq!(ConstraintFamily::total(1), 5);
    }

    #[test]
    fn test_threaded_labels_are_contiguous() {
        let inst = four_node();
        let mut next = FIRST_LABEL;
        let mut all = Vec::new();
        for family in ConstraintFamily::ORDER {
            let block = family.generate(&inst, next);
            assert_eq!(block.first_label(), family.first_label(inst.n()));
            next = block.next_label();
            let len = block.len();
            let names = labels(block);
            assert_eq!(names.len(), len);
            all.extend(names);
        }
        let expected: Vec<String> = (1..=29).map(|k| format!("c{}", k)).collect();
        assert_eq!(all, expected);
        assert_eq!(next, 30);
    }

    #[test]
    fn test_assignment() {
        let inst = four_node();
        let block = assignment_constraints(&inst, 1);
        assert_eq!(block.len(), 4);
        let rows: Vec<_> = block.collect();

        for (i, c) in rows.iter().enumerate() {
            assert_eq!(c.op, ConstraintOp::Eq);
            assert_eq!(c.rhs, 1.0);
            assert_eq!(c.terms.len(), 4);
            for j in 1..=4 {
                assert_eq!(c.coefficient(&format!("x{}_{}", i + 1, j)), Some(1.0));
            }
        }
    }

    #[test]
    fn test_facility_count() {
        let inst = four_node();
        let rows: Vec<_> = facility_count_constraint(&inst, 5).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "c5");
        assert_eq!(rows[0].op, ConstraintOp::Le);
        assert_eq!(rows[0].rhs, 1.0);
        let vars: Vec<_> = rows[0].terms.iter().map(|t| t.variable.as_str()).collect();
        assert_eq!(vars, vec!["y1", "y2", "y3", "y4"]);
    }

    #[test]
    fn test_facility_count_uses_p() {
        let inst = Instance::new(
            vec![vec![0.0, 1.0, 2.0], vec![1.0, 0.0, 1.0], vec![2.0, 1.0, 0.0]],
            vec![1.0; 3],
            vec![5.0; 3],
            2,
        )
        .unwrap();
        let rows: Vec<_> = facility_count_constraint(&inst, 4).collect();
        assert_eq!(rows[0].rhs, 2.0);
    }

    #[test]
    fn test_opening_layout() {
        let inst = four_node();
        let block = opening_constraints(&inst, 6);
        assert_eq!(block.next_label(), 22);
        let rows: Vec<_> = block.collect();
        assert_eq!(rows.len(), 16);

        for facility in 1..=4 {
            for client in 1..=4 {
                let c = &rows[(facility - 1) * 4 + (client - 1)];
                assert_eq!(c.name, format!("c{}", 6 + (facility - 1) * 4 + (client - 1)));
                assert_eq!(c.op, ConstraintOp::Ge);
                assert_eq!(c.rhs, 0.0);
                assert_eq!(c.terms.len(), 2);
                assert_eq!(c.coefficient(&format!("x{}_{}", client, facility)), Some(-1.0));
                assert_eq!(c.coefficient(&format!("y{}", facility)), Some(1.0));
            }
        }
    }

    #[test]
    fn test_capacity() {
        let inst = four_node();
        let rows: Vec<_> = capacity_constraints(&inst, 22).collect();
        assert_eq!(rows.len(), 4);

        let c23 = &rows[1];
        assert_eq!(c23.name, "c23");
        assert_eq!(c23.op, ConstraintOp::Le);
        assert_eq!(c23.rhs, 0.0);
        assert_eq!(c23.coefficient("y2"), Some(-6000.0));
        assert_eq!(c23.coefficient("x1_2"), Some(1000.0));
        assert_eq!(c23.coefficient("x2_2"), Some(1200.0));
        assert_eq!(c23.coefficient("x3_2"), Some(1400.0));
        assert_eq!(c23.coefficient("x4_2"), Some(1350.0));

        // zero capacity keeps the y term with a zero coefficient
        assert_eq!(rows[0].coefficient("y1"), Some(0.0));
        assert_eq!(rows[0].terms.len(), 5);
    }

    #[test]
    fn test_max_cost() {
        let inst = four_node();
        let rows: Vec<_> = max_cost_constraints(&inst, 26).collect();
        assert_eq!(rows.len(), 4);

        for (i, c) in rows.iter().enumerate() {
            assert_eq!(c.name, format!("c{}", 26 + i));
            assert_eq!(c.op, ConstraintOp::Le);
            assert_eq!(c.rhs, 0.0);
            assert_eq!(c.coefficient("W"), Some(-1.0));
            for j in 0..4 {
                assert_eq!(
                    c.coefficient(&format!("x{}_{}", i + 1, j + 1)),
                    Some(inst.cost(i, j))
                );
            }
        }
    }

    #[test]
    fn test_asymmetric_costs_follow_client_rows() {
        let inst = Instance::new(
            vec![vec![0.0, 7.0], vec![3.0, 0.0]],
            vec![1.0; 2],
            vec![2.0; 2],
            1,
        )
        .unwrap();
        let rows: Vec<_> = max_cost_constraints(&inst, 1).collect();
        assert_eq!(rows[0].coefficient("x1_2"), Some(7.0));
        assert_eq!(rows[1].coefficient("x2_1"), Some(3.0));
    }

    #[test]
    fn test_single_node() {
        let inst = Instance::new(vec![vec![0.0]], vec![5.0], vec![5.0], 1).unwrap();
        let mut next = FIRST_LABEL;
        for family in ConstraintFamily::ORDER {
            let block = family.generate(&inst, next);
            assert_eq!(block.len(), 1);
            next = block.next_label();
        }
        assert_eq!(next, 6);

        let a: Vec<_> = assignment_constraints(&inst, 1).collect();
        assert_eq!(a[0].terms, vec![Term::unit("x1_1")]);
    }
}
