use std::path::{Path, PathBuf};

use pcenter_model::{Instance, InstanceError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Error reading {0}: {1}")]
    Io(PathBuf, std::io::Error),
    #[error("Invalid number {value:?} in {path} (entry {index})")]
    InvalidNumber {
        path: PathBuf,
        index: usize,
        value: String,
    },
    #[error("Invalid JSON instance in {0}: {1}")]
    Json(PathBuf, serde_json::Error),
    #[error("{0}")]
    Instance(#[from] InstanceError),
}

/// Read a vector of numbers separated by whitespace, newlines or commas
pub fn read_vector(path: &Path) -> Result<Vec<f64>, InputError> {
    let source =
        std::fs::read_to_string(path).map_err(|e| InputError::Io(path.to_path_buf(), e))?;
    parse_vector(&source).map_err(|(index, value)| InputError::InvalidNumber {
        path: path.to_path_buf(),
        index,
        value,
    })
}

fn parse_vector(source: &str) -> Result<Vec<f64>, (usize, String)> {
    source
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .enumerate()
        .map(|(i, s)| s.parse::<f64>().map_err(|_| (i + 1, s.to_string())))
        .collect()
}

/// Row-major flat cost file plus demand and capacity files
pub fn load_vectors(
    costs: &Path,
    demand: &Path,
    capacity: &Path,
    p: usize,
) -> Result<Instance, InputError> {
    let costs = read_vector(costs)?;
    let demand = read_vector(demand)?;
    let capacity = read_vector(capacity)?;
    Ok(Instance::from_flat_costs(costs, demand, capacity, p)?)
}

/// JSON object `{ "cost": [[..]], "demand": [..], "capacity": [..], "p": 1 }`
pub fn load_json(path: &Path) -> Result<Instance, InputError> {
    let source =
        std::fs::read_to_string(path).map_err(|e| InputError::Io(path.to_path_buf(), e))?;
    serde_json::from_str(&source).map_err(|e| InputError::Json(path.to_path_buf(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vector() {
        assert_eq!(parse_vector("0\n13\n8\n15\n"), Ok(vec![0.0, 13.0, 8.0, 15.0]));
        assert_eq!(parse_vector("1000, 1200 1400\t1350"), Ok(vec![1000.0, 1200.0, 1400.0, 1350.0]));
        assert_eq!(parse_vector(""), Ok(vec![]));
        assert_eq!(parse_vector("1\nabc\n"), Err((2, "abc".to_string())));
    }

    #[test]
    fn test_json_instance() {
        let json = r#"{"cost": [[0, 3], [3, 0]], "demand": [1, 2], "capacity": [5, 0], "p": 1}"#;
        let inst: Instance = serde_json::from_str(json).unwrap();
        assert_eq!(inst.n(), 2);
        assert_eq!(inst.cost(0, 1), 3.0);
    }

    #[test]
    fn test_json_instance_is_validated() {
        let json = r#"{"cost": [[0, 3], [3]], "demand": [1, 2], "capacity": [5, 0], "p": 1}"#;
        let err = serde_json::from_str::<Instance>(json).unwrap_err();
        assert!(err.to_string().contains("not square"));
    }
}
