//! portability-auth CLI binary entry point.

use clap::Parser;
use portability_auth::cli::{handlers, Cli, Commands, JobCommands};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "portability_auth=debug"
    } else {
        "portability_auth=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = cli.config.as_deref();
    let result = match &cli.command {
        Commands::Parse(args) => handlers::handle_parse(&args.url),
        Commands::Handle(args) => handlers::handle_callback(config, args).await,
        Commands::Job(job_args) => match &job_args.command {
            JobCommands::Show(args) => handlers::handle_job_show(config, &args.token).await,
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
