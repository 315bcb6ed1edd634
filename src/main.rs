use clap::Parser;
use tracing_subscriber::EnvFilter;

use mirrortree::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("mirrortree=debug,info")
    } else {
        EnvFilter::new("mirrortree=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let config = cli::load_config(cli.config.as_deref())?;

    match cli.command {
        cli::Commands::Filter(args) => {
            cli::filter::run(args, cli.format, &config)?;
        }
        cli::Commands::Select(args) => {
            cli::select::run(args, cli.format, &config)?;
        }
        cli::Commands::Correlate(args) => {
            cli::correlate::run(args, cli.format)?;
        }
    }

    Ok(())
}
