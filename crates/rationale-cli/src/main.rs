//! Rationale CLI - Record decisions and explore the graph they form.

use clap::Parser;
use rationale_cli::commands;
use rationale_cli::repl;
use rationale_cli::{open_service, Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize tracing (log to stderr so stdout stays parseable)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Config errors are reported before a formatter exists
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    if let Err(e) = run(cli, config, &formatter).await {
        eprintln!("{}", formatter.failure(&e));
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> rationale_cli::Result<Config> {
    match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn run(cli: Cli, mut config: Config, formatter: &Formatter) -> rationale_cli::Result<()> {
    if let Some(Command::Cluster(args)) = &cli.command {
        if let Some(preset) = args.preset {
            config.engine.cluster = preset.into();
        }
    }

    let service = open_service(&config, cli.db.as_deref())?;

    // Handle commands
    match cli.command {
        None | Some(Command::Repl) => {
            // Enter REPL mode
            repl::run_repl(&service, &config, formatter).await?;
        }
        Some(Command::Record(args)) => {
            commands::execute_record(args, &service, formatter).await?;
        }
        Some(Command::Link(args)) => {
            commands::execute_link(args, &service, formatter).await?;
        }
        Some(Command::Graph(args)) => {
            commands::execute_graph(args, &service, formatter).await?;
        }
        Some(Command::Cluster(_)) => {
            commands::execute_cluster(&service, formatter).await?;
        }
        Some(Command::Similar(args)) => {
            commands::execute_similar(args, &service, formatter).await?;
        }
        Some(Command::Neighborhood(args)) => {
            commands::execute_neighborhood(args, &service, formatter).await?;
        }
        Some(Command::Search(args)) => {
            commands::execute_search(args, &service, formatter).await?;
        }
        Some(Command::Outcome(args)) => {
            commands::execute_outcome(args, &service, formatter).await?;
        }
    }

    Ok(())
}
