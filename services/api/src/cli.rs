use crate::demo::{run_demo, run_score, DemoArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use vendorscore::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "VendorScore",
    about = "Run the VendorScore supplier evaluation service or score evaluations from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Walk through a complete supplier evaluation against the in-memory store
    Demo(DemoArgs),
    /// Score a JSON file holding criteria, ratings and raw weights
    Score(ScoreArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// CSV criteria catalog (id,block,label,points_max); defaults to the built-in catalog
    #[arg(long)]
    pub(crate) criteria_csv: Option<PathBuf>,
    /// Organization to seed with the default weight matrix on startup
    #[arg(long)]
    pub(crate) seed_organization: Option<String>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args),
        Command::Score(args) => run_score(args),
    }
}
