pub mod assembler;
pub mod constraints;
pub mod declarations;
pub mod error;
pub mod inspect;
pub mod instance;
pub mod variables;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use assembler::{Assembler, ModelOptions, ModelStats, DEFAULT_TITLE};
pub use constraints::{Block, ConstraintFamily, FIRST_LABEL};
pub use error::{GenerateError, InspectError, InstanceError};
pub use inspect::{inspect_lp, recover_stats};
pub use instance::{Instance, InstanceData};
pub use variables::Var;
