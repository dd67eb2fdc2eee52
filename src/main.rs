use clap::Parser;
use logo_verify::core::report;
use logo_verify::utils::{logger, validation::Validate};
use logo_verify::{CliConfig, SizeVerifier};

fn main() {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting logo-verify");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let target = match config.target_spec() {
        Ok(target) => target,
        Err(e) => {
            tracing::error!("Failed to load target spec: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    println!("{}", report::render_header(&config.template_path));

    let verifier = SizeVerifier::new(config.template_path, config.sheet_name, target);
    match verifier.run() {
        Ok(result) => {
            print!("{}", report::render_report(&result));
            std::process::exit(if result.passed() { 0 } else { 1 });
        }
        Err(e) => {
            tracing::error!("Verification failed: {}", e);
            println!("{}", report::render_error(&e));
            std::process::exit(1);
        }
    }
}
