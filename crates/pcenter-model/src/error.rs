use pcenter_lp::ParseError;
use thiserror::Error;

/// Problems with the input data, detected once when an `Instance` is built
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InstanceError {
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Empty instance: at least one node is required")]
    EmptyInstance,
}

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Invalid instance: {0}")]
    Instance(#[from] InstanceError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An LP document that does not have the shape of a p-center model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InspectError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Not a p-center model: {0}")]
    Inconsistent(String),
}
