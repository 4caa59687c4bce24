use crate::error::InstanceError;

/// Raw instance data, as read from JSON or built by callers before validation
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceData {
    /// `cost[client][facility]`
    pub cost: Vec<Vec<f64>>,
    pub demand: Vec<f64>,
    pub capacity: Vec<f64>,
    /// Maximum number of facilities to site
    pub p: usize,
}

/// A validated capacitated p-center instance.
///
/// Facility sites and clients are the same `n` nodes, so the cost matrix is
/// `n × n`. Once built an instance never changes.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "InstanceData", into = "InstanceData")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    cost: Vec<Vec<f64>>,
    demand: Vec<f64>,
    capacity: Vec<f64>,
    p: usize,
}

impl Instance {
    pub fn new(
        cost: Vec<Vec<f64>>,
        demand: Vec<f64>,
        capacity: Vec<f64>,
        p: usize,
    ) -> Result<Self, InstanceError> {
        let n = cost.len();
        if n == 0 {
            return Err(InstanceError::EmptyInstance);
        }

        for (i, row) in cost.iter().enumerate() {
            if row.len() != n {
                return Err(InstanceError::ShapeMismatch(format!(
                    "cost matrix is not square: row {} has {} entries, expected {}",
                    i + 1,
                    row.len(),
                    n
                )));
            }
        }
        check_length("demand", &demand, n)?;
        check_length("capacity", &capacity, n)?;

        if !(1..=n).contains(&p) {
            return Err(InstanceError::InvalidParameter(format!(
                "facility count p = {} must be between 1 and {}",
                p, n
            )));
        }

        for (i, row) in cost.iter().enumerate() {
            if let Some(j) = row.iter().position(|c| !c.is_finite()) {
                return Err(InstanceError::InvalidParameter(format!(
                    "cost[{}][{}] is not a finite number",
                    i + 1,
                    j + 1
                )));
            }
        }
        check_non_negative("demand", &demand)?;
        check_non_negative("capacity", &capacity)?;

        Ok(Self {
            cost,
            demand,
            capacity,
            p,
        })
    }

    /// Build from a row-major cost vector of length `n²`
    pub fn from_flat_costs(
        costs: Vec<f64>,
        demand: Vec<f64>,
        capacity: Vec<f64>,
        p: usize,
    ) -> Result<Self, InstanceError> {
        if costs.is_empty() {
            return Err(InstanceError::EmptyInstance);
        }
        let n = costs.len().isqrt();
        if n * n != costs.len() {
            return Err(InstanceError::ShapeMismatch(format!(
                "{} cost values do not form a square matrix",
                costs.len()
            )));
        }
        let cost = costs.chunks(n).map(<[f64]>::to_vec).collect();
        Self::new(cost, demand, capacity, p)
    }

    /// Number of nodes; both the client count and the facility site count
    pub fn n(&self) -> usize {
        self.cost.len()
    }

    pub fn p(&self) -> usize {
        self.p
    }

    /// Travel cost from `client` to `facility`, 0-based
    pub fn cost(&self, client: usize, facility: usize) -> f64 {
        self.cost[client][facility]
    }

    pub fn cost_matrix(&self) -> &[Vec<f64>] {
        &self.cost
    }

    pub fn demand(&self) -> &[f64] {
        &self.demand
    }

    pub fn capacity(&self) -> &[f64] {
        &self.capacity
    }
}

fn check_length(what: &str, values: &[f64], n: usize) -> Result<(), InstanceError> {
    if values.len() != n {
        return Err(InstanceError::ShapeMismatch(format!(
            "{} has {} entries, expected {}",
            what,
            values.len(),
            n
        )));
    }
    Ok(())
}

fn check_non_negative(what: &str, values: &[f64]) -> Result<(), InstanceError> {
    match values.iter().position(|v| !v.is_finite() || *v < 0.0) {
        Some(i) => Err(InstanceError::InvalidParameter(format!(
            "{}[{}] = {} must be a non-negative number",
            what,
            i + 1,
            values[i]
        ))),
        None => Ok(()),
    }
}

impl TryFrom<InstanceData> for Instance {
    type Error = InstanceError;

    fn try_from(data: InstanceData) -> Result<Self, Self::Error> {
        Instance::new(data.cost, data.demand, data.capacity, data.p)
    }
}

impl From<Instance> for InstanceData {
    fn from(instance: Instance) -> Self {
        InstanceData {
            cost: instance.cost,
            demand: instance.demand,
            capacity: instance.capacity,
            p: instance.p,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Four nodes, one site with capacity 6000
    pub(crate) fn four_node() -> Instance {
        Instance::from_flat_costs(
            vec![
                0.0, 13.0, 8.0, 15.0, //
                13.0, 0.0, 12.0, 11.0, //
                8.0, 12.0, 0.0, 10.0, //
                15.0, 11.0, 10.0, 0.0,
            ],
            vec![1000.0, 1200.0, 1400.0, 1350.0],
            vec![0.0, 6000.0, 0.0, 0.0],
            1,
        )
        .unwrap()
    }

    #[test]
    fn test_four_node() {
        let inst = four_node();
        assert_eq!(inst.n(), 4);
        assert_eq!(inst.p(), 1);
        assert_eq!(inst.cost(0, 3), 15.0);
        assert_eq!(inst.cost(2, 1), 12.0);
        assert_eq!(inst.capacity()[1], 6000.0);
    }

    #[test]
    fn test_non_square_cost() {
        let err = Instance::new(
            vec![vec![0.0, 1.0], vec![1.0]],
            vec![1.0, 1.0],
            vec![1.0, 1.0],
            1,
        )
        .unwrap_err();
        assert!(matches!(err, InstanceError::ShapeMismatch(_)));
    }

    #[test]
    fn test_flat_costs_not_square() {
        let err = Instance::from_flat_costs(vec![1.0; 5], vec![1.0; 2], vec![1.0; 2], 1).unwrap_err();
        assert!(matches!(err, InstanceError::ShapeMismatch(_)));
    }

    #[test]
    fn test_vector_lengths() {
        let cost = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let err = Instance::new(cost.clone(), vec![1.0], vec![1.0, 1.0], 1).unwrap_err();
        assert!(matches!(err, InstanceError::ShapeMismatch(m) if m.contains("demand")));

        let err = Instance::new(cost, vec![1.0, 1.0], vec![1.0, 1.0, 1.0], 1).unwrap_err();
        assert!(matches!(err, InstanceError::ShapeMismatch(m) if m.contains("capacity")));
    }

    #[test]
    fn test_facility_count_range() {
        let cost = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        for p in [0, 3] {
            let err = Instance::new(cost.clone(), vec![1.0; 2], vec![1.0; 2], p).unwrap_err();
            assert!(matches!(err, InstanceError::InvalidParameter(_)));
        }
        assert!(Instance::new(cost, vec![1.0; 2], vec![1.0; 2], 2).is_ok());
    }

    #[test]
    fn test_negative_values() {
        let cost = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let err = Instance::new(cost.clone(), vec![1.0, -1.0], vec![1.0; 2], 1).unwrap_err();
        assert!(matches!(err, InstanceError::InvalidParameter(m) if m.contains("demand[2]")));

        let err = Instance::new(cost.clone(), vec![1.0; 2], vec![-5.0, 1.0], 1).unwrap_err();
        assert!(matches!(err, InstanceError::InvalidParameter(m) if m.contains("capacity[1]")));

        // negative travel costs are passed through
        let cost = vec![vec![-3.0, 1.0], vec![1.0, 0.0]];
        assert!(Instance::new(cost, vec![1.0; 2], vec![1.0; 2], 1).is_ok());
    }

    #[test]
    fn test_non_finite_cost() {
        let cost = vec![vec![0.0, f64::NAN], vec![1.0, 0.0]];
        let err = Instance::new(cost, vec![1.0; 2], vec![1.0; 2], 1).unwrap_err();
        assert!(matches!(err, InstanceError::InvalidParameter(_)));
    }

    #[test]
    fn test_empty() {
        assert_eq!(
            Instance::new(vec![], vec![], vec![], 1).unwrap_err(),
            InstanceError::EmptyInstance
        );
        assert_eq!(
            Instance::from_flat_costs(vec![], vec![], vec![], 1).unwrap_err(),
            InstanceError::EmptyInstance
        );
    }

    #[test]
    fn test_try_from_data() {
        let data = InstanceData {
            cost: vec![vec![0.0]],
            demand: vec![10.0],
            capacity: vec![10.0],
            p: 1,
        };
        let inst = Instance::try_from(data.clone()).unwrap();
        assert_eq!(InstanceData::from(inst), data);
    }
}
