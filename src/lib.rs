pub mod config;
pub mod core;
pub mod utils;

pub use crate::config::CliConfig;
pub use crate::core::verifier::{LogoDimensions, SizeVerifier, TargetSpec, VerificationReport};
pub use crate::utils::error::{Result, VerifyError};
