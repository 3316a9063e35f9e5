pub mod cli;
pub mod error;
pub mod models;
pub mod oracle;
pub mod output;
pub mod search;

pub use error::{Result, TunerError};
pub use models::{KdfFamily, ParameterPoint};
