mod script;

use std::path::PathBuf;
use std::process::ExitCode;

use artisan_dnd::config::GestureConfig;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        error!("usage: artisan-dnd <script.json>");
        return ExitCode::from(2);
    };

    let config = match GestureConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "config load failed");
            return ExitCode::FAILURE;
        }
    };

    let outcome = match script::load(&path).await {
        Ok(script) => script::replay(&script, config).await,
        Err(e) => Err(e),
    };
    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %e, path = %path.display(), "replay failed");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&outcome) {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "report serialization failed");
            ExitCode::FAILURE
        }
    }
}
