use crate::demo::{run_demo, run_inventory_alerts, DemoArgs, InventoryAlertsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use shelter_ops::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Shelter Ops",
    about = "Run the shelter operations service and its reporting tools from the command line",
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
    /// Inspect inventory stock and expiry alerts
    Inventory {
        #[command(subcommand)]
        command: InventoryCommand,
    },
    /// Run an end-to-end CLI demo covering the adoption lifecycle
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum InventoryCommand {
    /// Classify inventory into low-stock and expiry buckets
    Alerts(InventoryAlertsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Inventory {
            command: InventoryCommand::Alerts(args),
        } => run_inventory_alerts(args),
        Command::Demo(args) => run_demo(args),
    }
}
