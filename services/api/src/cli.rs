use crate::demo::{
    run_batch, run_calculate, run_demo, run_templates, BatchArgs, CalculateArgs, TemplatesArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use unit_economics::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Unit Economics Calculator",
    about = "Calculate unit economics for subscription, sales, project and commission models",
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
    /// List business-model templates and their input fields
    Templates(TemplatesArgs),
    /// Run one calculation from field=value inputs
    Calculate(CalculateArgs),
    /// Run one calculation per row of a CSV file
    Batch(BatchArgs),
    /// Walk through the reference scenarios end to end
    Demo,
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
        Command::Templates(args) => run_templates(args),
        Command::Calculate(args) => run_calculate(args),
        Command::Batch(args) => run_batch(args),
        Command::Demo => run_demo(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calculate_collects_repeated_inputs() {
        let cli = Cli::try_parse_from([
            "unit-economics-api",
            "calculate",
            "--template",
            "project",
            "--input",
            "project_revenue=100000",
            "--input",
            "cac=10000",
            "--json",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Calculate(args)) => {
                assert_eq!(args.template.as_deref(), Some("project"));
                assert_eq!(args.inputs.len(), 2);
                assert!(args.json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["unit-economics-api"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
