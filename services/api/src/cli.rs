use crate::demo::{run_demo, run_quote, run_schedule, DemoArgs, QuoteArgs, ScheduleArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use visa_flow::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "EuroVisa Flow",
    about = "Quote visa payment plans and run the applicant service from the command line",
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
    /// Print the payment plans offered for a destination
    Quote(QuoteArgs),
    /// Print the dated installment schedule for one plan
    Schedule(ScheduleArgs),
    /// Run an end-to-end walkthrough against the seeded catalog
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
        Command::Quote(args) => run_quote(args),
        Command::Schedule(args) => run_schedule(args),
        Command::Demo(args) => run_demo(args),
    }
}
