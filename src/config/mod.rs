pub mod toml_config;

use std::path::Path;

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::core::verifier::TargetSpec;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use self::toml_config::TargetFileConfig;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "logo-verify")]
#[command(about = "Verify the embedded logo size in a media plan template")]
pub struct CliConfig {
    #[arg(long, default_value = "KULT_MEDIAPLAN_TEMPLATE.xlsx")]
    pub template_path: String,

    #[arg(long, default_value = "KULT MEDIA PLAN")]
    pub sheet_name: String,

    #[arg(long, help = "TOML file overriding the target dimensions")]
    pub config_file: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Target spec for this run: defaults, overridden by the optional
    /// config file, validated before use.
    pub fn target_spec(&self) -> Result<TargetSpec> {
        let mut target = TargetSpec::default();

        if let Some(path) = &self.config_file {
            let overrides = TargetFileConfig::from_file(Path::new(path))?;
            target = overrides.apply(target);
            tracing::debug!("Target spec after overrides from {}: {:?}", path, target);
        }

        target.validate()?;
        Ok(target)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("template_path", &self.template_path)?;
        validate_non_empty_string("sheet_name", &self.sheet_name)?;

        if let Some(config_file) = &self.config_file {
            validate_path("config_file", config_file)?;
        }

        Ok(())
    }
}
