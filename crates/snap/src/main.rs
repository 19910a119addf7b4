use std::process::ExitCode;

use vsnap_lib::probe;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vsnap_lib=info,vsnap_probe=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let outcome = probe::parse_args(&args).and_then(|args| probe::run(&args));

    match outcome {
        Ok(outcome) => match serde_json::to_string_pretty(&outcome) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("Failed to serialize snap result: {e}");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("usage: vsnap-probe --scene <scene.json> [--settings <settings.json>] [--viewport <viewport.json>] --cursor <x>,<y>");
            ExitCode::FAILURE
        }
    }
}
