use anyhow::Result;
use clap::Parser;
use tomcat_exporter::{cli::Args, config::Config, plugin, server};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; stdout is reserved for plugin output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(&args.config)?;

    // Override with CLI arguments if provided
    args.apply(&mut config);
    config.validate()?;

    if args.once {
        match plugin::run_once(&config, args.meta).await {
            Ok(output) => print!("{}", output),
            Err(e) => {
                error!("{:#}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    info!(
        "Starting Tomcat Exporter v{}",
        env!("CARGO_PKG_VERSION")
    );
    info!("Configuration loaded successfully");
    info!("Tomcat: {} ({:?} mode)", config.tomcat.base_url(), config.tomcat.mode);
    info!(
        "Metrics endpoint: http://{}:{}/metrics",
        config.server.addr, config.server.port
    );

    // Start the metrics server
    if let Err(e) = server::start(config).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
