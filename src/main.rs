use clap::Parser;
use folio_admin::app::commands;
use folio_admin::utils::logger;
use folio_admin::CliConfig;

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    if config.json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::debug!("Starting folio CLI");

    if let Err(e) = commands::run(config).await {
        tracing::error!("❌ Command failed: {} (Category: {:?})", e, e.category());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}
