use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, prelude::*};

use self::{describe::DescribeArg, diagnose::DiagnoseArg, test::TestArg};

mod describe;
mod diagnose;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v: info, -vv: debug); `RUST_LOG` takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Print summary statistics and a histogram for columns
    Describe(#[clap(flatten)] DescribeArg),
    /// Run normality and variance checks and list the tests they allow
    Diagnose(#[clap(flatten)] DiagnoseArg),
    /// Run a hypothesis test on selected columns
    Test(#[clap(flatten)] TestArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_tracing(args.verbose);
    match &args.mode {
        Mode::Describe(arg) => describe::run(arg)?,
        Mode::Diagnose(arg) => diagnose::run(arg)?,
        Mode::Test(arg) => test::run(arg)?,
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_test_subcommand() {
        let args = CommandArgs::try_parse_from([
            "hypotest",
            "-vv",
            "test",
            "data.csv",
            "--column",
            "score",
            "--test",
            "Mann-Whitney U Test",
            "--with",
            "control",
        ])
        .unwrap();
        assert_eq!(args.verbose, 2);
        let Mode::Test(arg) = args.mode else {
            panic!("expected test mode");
        };
        assert_eq!(arg.test, hypotest_core::request::TestName::MannWhitneyU);
    }

    #[test]
    fn test_unknown_test_name_is_rejected() {
        let err = CommandArgs::try_parse_from([
            "hypotest", "test", "--text", "1 2 3", "--column", "Column_1", "--test", "z-test",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("unknown test 'z-test'"));
    }

    #[test]
    fn test_input_and_text_conflict() {
        assert!(
            CommandArgs::try_parse_from([
                "hypotest", "describe", "data.csv", "--text", "1 2 3",
            ])
            .is_err()
        );
        assert!(CommandArgs::try_parse_from(["hypotest", "describe"]).is_err());
    }
}
