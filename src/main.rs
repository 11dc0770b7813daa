mod cli;
mod config;
mod execution;
mod explain;
mod handlers;
mod language;
mod llm;
mod printer;
mod utils;

use anyhow::Result;
use config::Config;
use explain::{Explainer, RemoteExplainer};
use execution::Executor;
use handlers::run::RunHandler;
use language::FileReference;
use printer::{Printer, Tone};
use tracing::debug;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Cli::parse();
    let printer = Printer::default();

    let Some(path) = args.file else {
        printer.print(Tone::Warning, &cli::Cli::usage());
        std::process::exit(1);
    };

    // Load config once; nothing below reads the environment again
    let cfg = Config::load();
    debug!(config = %cfg.config_path.display(), "configuration loaded");

    let remote = RemoteExplainer::from_config(&cfg);

    let executor = Executor::from_config(&cfg);
    let file = FileReference::new(path);
    debug!(path = %file.path().display(), language = %file.language(), "detected language");

    let handler = RunHandler {
        executor: &executor,
        remote: remote.as_ref().map(|r| r as &dyn Explainer),
        printer: &printer,
    };
    handler.run(&file).await
}
