pub mod drawing;
pub mod report;
pub mod verifier;
pub mod workbook;

pub use crate::core::verifier::{LogoDimensions, SizeVerifier, TargetSpec, VerificationReport};
