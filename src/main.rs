use anyhow::Result;
use clap::Parser;
use reaction_time::{
    cli::Cli,
    clock::SystemClock,
    config::SessionConfig,
    history::HistoryStore,
    session,
};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Defaults, then the optional TOML file, then command-line flags
fn load_config(args: &Cli) -> Result<SessionConfig> {
    let base = match &args.config {
        Some(path) => SessionConfig::from_toml(path)?,
        None => SessionConfig::default(),
    };

    let config = base.with_overrides(args.trials, args.log_file.clone());
    if let Err(e) = config.validate() {
        anyhow::bail!("Invalid configuration: {}", e);
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = load_config(&args)?;
    let store = HistoryStore::new(config.resolve_log_path()?);
    tracing::debug!(?config, log = %store.path().display(), "starting session");

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();

    session::run_session(
        &config,
        &store,
        &mut SystemClock::new(),
        &mut rand::thread_rng(),
        &mut stdin.lock(),
        &mut stdout.lock(),
    )?;

    Ok(())
}
