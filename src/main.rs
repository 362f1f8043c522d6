//! Release Stamp CLI
//!
//! Entry point for the `release-stamp` pipeline step. Inputs come from the
//! environment (`version_string`, `build_number`, `file_path`,
//! `destination_path`, `skip_release_date`); flags only adjust behaviour.

use clap::Parser;
use release_stamp::logging::init_tracing_once;
use release_stamp::pipeline::PipelineResult;
use release_stamp::{
    EnvmanPublisher, ExportPolicy, NoopPublisher, PipelineOptions, StampConfig, StampOutcome,
    StampPipeline, VariablePublisher, HASH_EXPORT_KEY,
};
use std::io;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "release-stamp")]
#[command(about = "Write a release descriptor for a build artifact", version)]
struct Cli {
    /// Skip the release date prompt regardless of skip_release_date
    #[arg(long)]
    skip_release_date: bool,

    /// Do not export the digest to later pipeline steps
    #[arg(long, conflicts_with = "require_export")]
    no_export: bool,

    /// Fail the run if the digest export fails
    #[arg(long)]
    require_export: bool,

    /// Key the digest is exported under
    #[arg(long, default_value = HASH_EXPORT_KEY)]
    export_key: String,

    /// envman executable used for the export
    #[arg(long, default_value = "envman")]
    envman: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing_once();

    let mut config = StampConfig::from_env();
    if cli.skip_release_date {
        config.skip_release_date = "true".to_string();
    }

    let options = PipelineOptions {
        export_policy: if cli.require_export {
            ExportPolicy::Required
        } else {
            ExportPolicy::BestEffort
        },
        export_key: cli.export_key,
    };

    let result = if cli.no_export {
        run(StampPipeline::new(config, NoopPublisher).options(options))
    } else {
        run(StampPipeline::new(config, EnvmanPublisher::new(cli.envman)).options(options))
    };

    match result {
        Ok(outcome) => {
            tracing::info!(
                destination = %outcome.destination.display(),
                exported = outcome.exported,
                "release descriptor complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn run<P: VariablePublisher>(pipeline: StampPipeline<P>) -> PipelineResult<StampOutcome> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    pipeline.run(stdin.lock(), stdout.lock())
}
