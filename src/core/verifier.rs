use std::io::Cursor;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::drawing::{emu_to_pixels, first_picture};
use crate::core::workbook::XlsxPackage;
use crate::utils::error::{Result, VerifyError};
use crate::utils::validation::{validate_positive_number, validate_range, Validate};

/// The dimensions the logo must match: 2.0" × 0.65" (192×62 px @ 96 DPI),
/// within ±5% per dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub width_px: u32,
    pub height_px: u32,
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: u32,
    pub tolerance: f64,
}

impl Default for TargetSpec {
    fn default() -> Self {
        Self {
            width_px: 192,
            height_px: 62,
            width_in: 2.0,
            height_in: 0.65,
            dpi: 96,
            tolerance: 0.05,
        }
    }
}

impl Validate for TargetSpec {
    fn validate(&self) -> Result<()> {
        validate_positive_number("target.width_px", self.width_px, 1)?;
        validate_positive_number("target.height_px", self.height_px, 1)?;
        validate_positive_number("target.dpi", self.dpi, 1)?;
        validate_range("target.tolerance", self.tolerance, 0.0, 1.0)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoDimensions {
    pub width_px: u32,
    pub height_px: u32,
}

impl LogoDimensions {
    pub fn width_in(&self, dpi: u32) -> f64 {
        f64::from(self.width_px) / f64::from(dpi)
    }

    pub fn height_in(&self, dpi: u32) -> f64 {
        f64::from(self.height_px) / f64::from(dpi)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionCheck {
    pub actual_px: u32,
    pub target_px: u32,
    pub passed: bool,
}

impl DimensionCheck {
    /// A dimension passes when |actual − target| ≤ target × tolerance.
    /// The band is symmetric: oversized and undersized use the same
    /// threshold.
    fn evaluate(actual_px: u32, target_px: u32, tolerance: f64) -> Self {
        let diff = (f64::from(actual_px) - f64::from(target_px)).abs();
        Self {
            actual_px,
            target_px,
            passed: diff <= f64::from(target_px) * tolerance,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerificationReport {
    pub template_path: String,
    pub sheet_name: String,
    pub dimensions: LogoDimensions,
    pub target: TargetSpec,
    pub width: DimensionCheck,
    pub height: DimensionCheck,
}

impl VerificationReport {
    pub fn passed(&self) -> bool {
        self.width.passed && self.height.passed
    }
}

pub struct SizeVerifier {
    template_path: String,
    sheet_name: String,
    target: TargetSpec,
}

impl SizeVerifier {
    pub fn new(template_path: String, sheet_name: String, target: TargetSpec) -> Self {
        Self {
            template_path,
            sheet_name,
            target,
        }
    }

    /// Open the template, find the first logo on the sheet and compare its
    /// size against the target.
    pub fn run(&self) -> Result<VerificationReport> {
        tracing::info!("Verifying logo size in {}", self.template_path);

        let mut package = XlsxPackage::open(Path::new(&self.template_path))?;
        let dimensions = self.extract_dimensions(&mut package)?;

        tracing::debug!(
            "Logo measures {}x{} px against target {}x{} px",
            dimensions.width_px,
            dimensions.height_px,
            self.target.width_px,
            self.target.height_px
        );

        Ok(VerificationReport {
            template_path: self.template_path.clone(),
            sheet_name: self.sheet_name.clone(),
            dimensions,
            target: self.target,
            width: DimensionCheck::evaluate(
                dimensions.width_px,
                self.target.width_px,
                self.target.tolerance,
            ),
            height: DimensionCheck::evaluate(
                dimensions.height_px,
                self.target.height_px,
                self.target.tolerance,
            ),
        })
    }

    fn extract_dimensions<R: std::io::Read + std::io::Seek>(
        &self,
        package: &mut XlsxPackage<R>,
    ) -> Result<LogoDimensions> {
        let sheet_part = package.sheet_part(&self.sheet_name)?;
        let drawing_part =
            package
                .drawing_part(&sheet_part)?
                .ok_or_else(|| VerifyError::NoLogoFound {
                    sheet: self.sheet_name.clone(),
                })?;

        let drawing_xml = package.read_part(&drawing_part)?;
        let picture = first_picture(&drawing_xml)?.ok_or_else(|| VerifyError::NoLogoFound {
            sheet: self.sheet_name.clone(),
        })?;

        if let Some((cx, cy)) = picture.extent_emu {
            return Ok(LogoDimensions {
                width_px: emu_to_pixels(cx),
                height_px: emu_to_pixels(cy),
            });
        }

        // No displayed extent in the drawing; fall back to the intrinsic
        // pixel size of the backing image.
        let embed_rid = picture
            .embed_rid
            .ok_or_else(|| VerifyError::InvalidWorkbook {
                message: "picture has neither an extent nor an image reference".to_string(),
            })?;
        let media_part = package.media_part(&drawing_part, &embed_rid)?;
        tracing::debug!("Using intrinsic size of media part '{}'", media_part);

        let media = package.read_part(&media_part)?;
        let (width_px, height_px) = image::ImageReader::new(Cursor::new(media))
            .with_guessed_format()?
            .into_dimensions()?;

        Ok(LogoDimensions {
            width_px,
            height_px,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(actual: u32, target: u32) -> DimensionCheck {
        DimensionCheck::evaluate(actual, target, 0.05)
    }

    #[test]
    fn test_exact_match_passes() {
        assert!(check(192, 192).passed);
        assert!(check(62, 62).passed);
    }

    #[test]
    fn test_width_within_tolerance_passes() {
        // 5% of 192 is 9.6 px; 200 is 8 px off.
        assert!(check(200, 192).passed);
    }

    #[test]
    fn test_width_outside_tolerance_fails() {
        // 210 is 18 px off.
        assert!(!check(210, 192).passed);
    }

    #[test]
    fn test_tolerance_is_symmetric() {
        // 8 px under also passes, 10 px under also fails.
        assert!(check(184, 192).passed);
        assert!(!check(182, 192).passed);
    }

    #[test]
    fn test_report_requires_both_dimensions() {
        let target = TargetSpec::default();
        let report = VerificationReport {
            template_path: "template.xlsx".to_string(),
            sheet_name: "KULT MEDIA PLAN".to_string(),
            dimensions: LogoDimensions {
                width_px: 150,
                height_px: 62,
            },
            target,
            width: DimensionCheck::evaluate(150, target.width_px, target.tolerance),
            height: DimensionCheck::evaluate(62, target.height_px, target.tolerance),
        };

        assert!(!report.passed());
        assert!(!report.width.passed);
        assert!(report.height.passed);
    }

    #[test]
    fn test_inch_conversion() {
        let dims = LogoDimensions {
            width_px: 192,
            height_px: 62,
        };
        assert!((dims.width_in(96) - 2.0).abs() < f64::EPSILON);
        assert!((dims.height_in(96) - 0.6458).abs() < 0.001);
    }

    #[test]
    fn test_target_spec_validation() {
        assert!(TargetSpec::default().validate().is_ok());

        let bad_tolerance = TargetSpec {
            tolerance: 1.5,
            ..TargetSpec::default()
        };
        assert!(bad_tolerance.validate().is_err());

        let zero_dpi = TargetSpec {
            dpi: 0,
            ..TargetSpec::default()
        };
        assert!(zero_dpi.validate().is_err());
    }
}
