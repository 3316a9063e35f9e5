pub mod params;

pub use params::{KdfFamily, ParameterPoint};
