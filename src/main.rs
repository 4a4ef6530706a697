use clap::Parser;
use parlay_engine::cli::{Cli, Commands};
use parlay_engine::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize telemetry
    parlay_engine::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Quote(args) => args.execute(&config).await?,
        Commands::Assess(args) => args.execute(&config).await?,
        Commands::Cashout(args) => args.execute(&config).await?,
        Commands::Demo(args) => {
            tracing::info!("Starting paper lifecycle demo");
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Pricing: base={}bps per_leg={}bps legs={}..={} min_stake={}",
                config.pricing.base_fee_bps,
                config.pricing.per_leg_fee_bps,
                config.pricing.min_legs,
                config.pricing.max_legs,
                config.pricing.min_stake
            );
            println!("  Risk: default tolerance {}", config.risk.default_tolerance);
            println!(
                "  Cashout: penalty={}bps slippage={}bps",
                config.cashout.penalty_bps, config.cashout.slippage_bps
            );
            println!("  Settler: every {}ms", config.settler.poll_interval_ms);
            println!(
                "  Telemetry: {} {:?} metrics={:?}",
                config.telemetry.log_level,
                config.telemetry.log_format,
                config.telemetry.metrics_port
            );
        }
    }

    Ok(())
}
