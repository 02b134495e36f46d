mod output;
mod run;

use clap::Parser;
use keylister_core::ListerConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "aws-access-key-lister",
    about = "List IAM users' access keys across many AWS accounts by assuming a role in each",
    version
)]
struct Cli {
    /// AWS CLI profile holding the credentials used to assume each role
    #[arg(long, env = "AWS_PROFILE", default_value = "default")]
    aws_profile: String,

    /// Region for the STS and IAM clients
    #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
    region: String,

    /// CSV of `account_id,role_name` lines, no header
    #[arg(long, default_value = "accountlist.csv")]
    account_list_file: PathBuf,

    /// Where to write the access key report
    #[arg(long, default_value = "output.csv")]
    output_file: PathBuf,

    /// Number of concurrent access key listings
    #[arg(long, default_value_t = 10)]
    workers: usize,

    /// Role session name passed to AssumeRole
    #[arg(long, default_value = "aws-access-key-lister")]
    session_name: String,

    /// Show debug logs
    #[arg(long)]
    debug: bool,

    /// Print the run summary as JSON
    #[arg(long, short = 'j')]
    json: bool,
}

impl Cli {
    fn lister_config(&self) -> ListerConfig {
        ListerConfig {
            workers: self.workers,
            session_name: self.session_name.clone(),
            region: self.region.clone(),
            profile: Some(self.aws_profile.clone()),
        }
    }
}

/// `RUST_LOG` wins when set and parseable; otherwise `--debug` picks the level.
fn log_filter(rust_log: Option<&str>, debug: bool) -> EnvFilter {
    let default_level = if debug { "debug" } else { "info" };
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level))
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(
            std::env::var("RUST_LOG").ok().as_deref(),
            cli.debug,
        ))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let options = run::RunOptions {
        config: cli.lister_config(),
        account_list_file: cli.account_list_file,
        output_file: cli.output_file,
        json: cli.json,
    };

    if let Err(e) = run::run(options) {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
