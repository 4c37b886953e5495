use std::process::ExitCode;

use cmdgroup::cli::LogFormat;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let logs = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match LogFormat::from_env() {
        LogFormat::Json => logs.json().init(),
        LogFormat::Text => logs.init(),
    }

    let code = cmdgroup::cli::run(std::env::args_os()).await;
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
