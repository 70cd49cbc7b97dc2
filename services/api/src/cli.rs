use crate::report::{run_connections_report, ConnectionsReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use reviewmatch::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "ReviewMatch Separation Service",
    about = "Score author/reviewer conflicts of interest for ReviewMatch assignments",
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
    /// Inspect author/reviewer connections from a dataset export
    Connections {
        #[command(subcommand)]
        command: ConnectionsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConnectionsCommand {
    /// Print the connection matrix for current reviewer assignments
    Report(ConnectionsReportArgs),
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
        Command::Connections {
            command: ConnectionsCommand::Report(args),
        } => run_connections_report(args),
    }
}
