use std::io::{self, IsTerminal};
use std::process::ExitCode;

use clap::Parser;
use index_core::Endpoint;
use tracing_subscriber::EnvFilter;

/// Send one `GET /index.html` to 127.0.0.1 and print the first reply chunk.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Destination port; anything that is not a valid port falls back to 34567
    #[arg(allow_hyphen_values = true)]
    port: Option<String>,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    let args = Args::parse();
    let endpoint = Endpoint::from_arg(args.port.as_deref());

    let stdout = io::stdout();
    match index_core::run(&endpoint, &mut stdout.lock()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
