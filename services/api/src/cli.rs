use crate::demo::{run_calculate, run_demo, run_register_report, CalculateArgs, DemoArgs, RegisterArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use survey_scheduler::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Survey Scheduler",
    about = "Calculate ship certificate survey windows and run the scheduling service",
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
    /// Calculate surveys for a single certificate or a whole register export
    Survey {
        #[command(subcommand)]
        command: SurveyCommand,
    },
    /// Walk a sample ship through registration, endorsement and recalculation
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum SurveyCommand {
    /// Print the next survey for one certificate
    Calculate(CalculateArgs),
    /// Print a per-ship survey report for a certificate register CSV
    Register(RegisterArgs),
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
        Command::Survey {
            command: SurveyCommand::Calculate(args),
        } => run_calculate(args),
        Command::Survey {
            command: SurveyCommand::Register(args),
        } => run_register_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
