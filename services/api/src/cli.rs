use crate::screen::{run_classify, run_dataset_export, ClassifyArgs, DatasetExportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use talent_screen::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Talent Screen",
    about = "Classify and explain candidate profiles from the command line or over HTTP",
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
    /// Train the model and screen a single candidate
    Classify(ClassifyArgs),
    /// Work with labeled training datasets
    Dataset {
        #[command(subcommand)]
        command: DatasetCommand,
    },
}

#[derive(Subcommand, Debug)]
enum DatasetCommand {
    /// Write a synthetic labeled dataset as CSV
    Export(DatasetExportArgs),
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
        Command::Classify(args) => run_classify(args),
        Command::Dataset {
            command: DatasetCommand::Export(args),
        } => run_dataset_export(args),
    }
}
