// src/main.rs

use mdjob::{cli, logging, run};

#[tokio::main]
async fn main() {
    let args = cli::parse();

    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("mdjob error: {err:?}");
        std::process::exit(1);
    }

    if let Err(err) = run(args).await {
        tracing::error!(error = %err, "mdjob aborted");
        std::process::exit(err.exit_code());
    }
}
