use anyhow::Context;
use llm_cmd_helper::config::ConfigLoader;
use llm_cmd_helper::error::CmdHelperError;
use llm_cmd_helper::CommandFixer;
use std::io::Write;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "LLM_CMD_HELPER_LOG";

/// Logs go to stderr; stdout carries only the command.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn emit(text: &str) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.flush())
        .context("failed to write to stdout")
}

fn command_from_args() -> Result<String, CmdHelperError> {
    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "llm-cmd-helper".to_string());
    args.next()
        .ok_or(CmdHelperError::MissingArgument { program })
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let command = match command_from_args() {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let fixer = ConfigLoader::new().and_then(|loader| CommandFixer::new(loader.into_config()));
    let fixer = match fixer {
        Ok(fixer) => fixer,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match fixer.fix(&command).await {
        Ok(fixed) => match emit(&fixed) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("{:#}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            error!("LLM request failed: {}", e);
            // hand the original command back so the shell line is not lost
            if let Err(e) = emit(&command) {
                error!("{:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}
