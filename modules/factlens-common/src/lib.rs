pub mod config;
pub mod error;
pub mod normalize;
pub mod types;

pub use config::{Config, InferenceProvider, RunConfig, SearchProvider};
pub use error::FactLensError;
pub use types::*;
