use crate::demo::{run_demo, run_inventory_report, DemoArgs, InventoryReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use pantrix::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Pantrix",
    about = "Track pantry expiry and coordinate surplus food donations from the command line",
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
    /// Inspect inventory exports
    Inventory {
        #[command(subcommand)]
        command: InventoryCommand,
    },
    /// Walk through inventory triage, a donation and its fulfilment
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum InventoryCommand {
    /// Classify a CSV inventory export by expiry
    Report(InventoryReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Start with an empty inventory and donation history
    #[arg(long)]
    pub(crate) no_seed: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Inventory {
            command: InventoryCommand::Report(args),
        } => run_inventory_report(args),
        Command::Demo(args) => run_demo(args).await,
    }
}
