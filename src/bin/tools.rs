//! `tools` - call any registered operation from the command line.
//!
//! ```text
//! tools                          # list every namespace and operation
//! tools math__add 2 3            # {"result": 5.0}
//! tools datetime.current UTC     # dotted names are accepted too
//! tools --setup-profile          # fill in the user profile interactively
//! ```
//!
//! Exit codes: 0 on success (soft failures print their error mapping),
//! 1 on usage errors, 2 on hard failures.

use std::process::ExitCode;

use clap::Parser;
use tracing::{Level, debug};

use toolbox_mcp_server::core::{
    Config,
    logging::{init_logging, parse_level},
};
use toolbox_mcp_server::domains::tools::{
    Dispatcher, Registry,
    definitions::user_information::{DialoguerPrompter, SetupOutcome, ensure_profile},
};

const PROGRAM: &str = "tools";

const EXIT_USAGE: u8 = 1;
const EXIT_FAILURE: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = PROGRAM, version, about = "Call toolbox operations from the command line")]
struct Cli {
    /// Prompt for missing user profile fields and save them
    #[arg(long, conflicts_with = "name")]
    setup_profile: bool,

    /// Operation to call, as <namespace>__<operation>
    name: Option<String>,

    /// Positional arguments, coerced to the declared parameter types
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::from_env();

    // Quiet by default: stdout is the result, stderr is for problems.
    let level = std::env::var("MCP_LOG_LEVEL")
        .map(|raw| parse_level(&raw, Level::WARN))
        .unwrap_or(Level::WARN);
    init_logging(level, false);

    if cli.setup_profile {
        return setup_profile(&config);
    }

    let registry = match Registry::build() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_FAILURE);
        }
    };
    let dispatcher = Dispatcher::new(&registry, &config);

    let Some(name) = cli.name else {
        print!("{}", dispatcher.listing(PROGRAM));
        return ExitCode::SUCCESS;
    };

    match dispatcher.call(&name, &cli.args) {
        Ok(outcome) => {
            debug!("{} succeeded: {}", name, outcome.is_success());
            println!("{}", outcome.to_json());
            ExitCode::SUCCESS
        }
        Err(e) if e.is_usage() => {
            println!("Error: {}", e);
            println!("Run '{}' with no arguments to list every operation.", PROGRAM);
            ExitCode::from(EXIT_USAGE)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn setup_profile(config: &Config) -> ExitCode {
    let path = &config.tools.user_data_path;

    match ensure_profile(path, &mut DialoguerPrompter::new()) {
        Ok(SetupOutcome::AlreadyComplete) => ExitCode::SUCCESS,
        Ok(SetupOutcome::Saved { filled }) => {
            debug!("Filled {} field(s) in {}", filled.len(), path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
