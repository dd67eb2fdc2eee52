use crate::core::verifier::VerificationReport;
use crate::utils::error::VerifyError;

pub fn render_header(template_path: &str) -> String {
    format!("🔍 Checking logo size in template...\n   File: {}\n", template_path)
}

/// The dimension summary plus verdict; on failure, the remediation steps.
pub fn render_report(report: &VerificationReport) -> String {
    let dpi = report.target.dpi;
    let mut out = String::new();

    out.push_str("📐 Logo Dimensions:\n");
    out.push_str(&format!(
        "   Current:  {} × {} pixels ({:.2}\" × {:.2}\")\n",
        report.dimensions.width_px,
        report.dimensions.height_px,
        report.dimensions.width_in(dpi),
        report.dimensions.height_in(dpi),
    ));
    out.push_str(&format!(
        "   Target:   {} × {} pixels ({:.2}\" × {:.2}\")\n\n",
        report.target.width_px, report.target.height_px, report.target.width_in, report.target.height_in,
    ));

    if report.passed() {
        out.push_str("✅ SUCCESS: Logo size is CORRECT!\n");
        out.push_str(&format!(
            "   The logo is properly sized at {:.2}\" × {:.2}\"\n",
            report.target.width_in, report.target.height_in,
        ));
        return out;
    }

    out.push_str("❌ INCORRECT SIZE!\n");
    if !report.width.passed {
        out.push_str(&format!(
            "   ❌ Width is off: {} px (expected ~{} px)\n",
            report.width.actual_px, report.width.target_px,
        ));
    }
    if !report.height.passed {
        out.push_str(&format!(
            "   ❌ Height is off: {} px (expected ~{} px)\n",
            report.height.actual_px, report.height.target_px,
        ));
    }

    out.push('\n');
    out.push_str("📝 Manual fix required:\n");
    out.push_str(&format!("   1. Open {} in Excel\n", report.template_path));
    out.push_str("   2. Click the logo\n");
    out.push_str("   3. Right-click → Format Picture → Size\n");
    out.push_str(&format!(
        "   4. Set Width: {:.2}\" and Height: {:.2}\"\n",
        report.target.width_in, report.target.height_in,
    ));
    out.push_str("   5. Save and run this check again\n");

    out
}

pub fn render_error(error: &VerifyError) -> String {
    match error {
        VerifyError::FileNotFound { path } => format!("❌ ERROR: File not found: {}", path),
        VerifyError::NoLogoFound { .. } => "❌ ERROR: No logo found in template!".to_string(),
        other => format!("❌ ERROR: {}", other),
    }
}
