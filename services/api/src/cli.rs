use crate::demo::{list_drugs, run_analyze, run_demo, AnalyzeArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use pharmaguard::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "PharmaGuard",
    about = "Pharmacogenomic drug-risk assessment from variant files",
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
    /// Analyze a local variant file and print the results as JSON
    Analyze(AnalyzeArgs),
    /// List the supported drugs and their governing genes
    Drugs,
    /// Run the embedded sample patient through every supported drug
    Demo(DemoArgs),
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
        Command::Analyze(args) => run_analyze(args).await,
        Command::Drugs => {
            list_drugs();
            Ok(())
        }
        Command::Demo(args) => run_demo(args).await,
    }
}
