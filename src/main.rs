use anyhow::Context;
use city_library::domain::ports::ConfigProvider;
use city_library::utils::{logger, validation::Validate};
use city_library::{CliConfig, FlatFileRepository, Session, TomlConfig};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match &cli.config {
        Some(path) => {
            let mut config = TomlConfig::from_file(path)
                .with_context(|| format!("Failed to load config file '{}'", path))?;
            config.apply_cli_overrides(&cli);
            config
        }
        None => {
            let mut config = TomlConfig::default();
            config.apply_cli_overrides(&cli);
            config
        }
    };

    logger::init_cli_logger(cli.verbose, config.log_level());
    tracing::info!("Starting city-library");
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = cli.validate().and_then(|()| config.validate()) {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("{}", e.user_friendly_message());
        eprintln!("Suggestion: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let repository = FlatFileRepository::from_config(&config);
    tracing::info!(
        "Using {} and {}",
        repository.books_path().display(),
        repository.members_path().display()
    );

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut session = Session::start(
        repository,
        stdin.lock(),
        stdout.lock(),
        config.session_title(),
    )?;
    session.run()?;

    Ok(())
}
