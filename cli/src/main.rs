//! CLI entrypoint for foodtruck-research
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use foodtruck_application::{
    ConversationLogger, PipelineOutcome, ProgressNotifier, RunResearchInput, RunResearchUseCase,
};
use foodtruck_infrastructure::{
    ConfigLoader, FileConfig, JsonlConversationLogger, ReportWriter, build_gateway, select_model,
};
use foodtruck_presentation::{
    Cli, ConsoleFormatter, OutputConfig, ProgressReporter, ReportRenderer, SimpleProgress,
};
use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// The pipeline ran but a stage failed
const EXIT_PIPELINE_FAILED: u8 = 1;
/// Unusable arguments (clap uses the same code)
const EXIT_USAGE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    // Usage errors exit with status 2 from here
    let cli = Cli::parse();

    // Initialize logging based on verbosity level; RUST_LOG wins when set
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = if cli.no_config {
        ConfigLoader::load_without_files()
    } else {
        ConfigLoader::load(cli.config.as_deref())
    }
    .context("failed to load configuration")?;

    // Command-line model beats every other source
    if let Some(model) = cli.model_override() {
        config.model.name = model.to_string();
    }

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_deref(), cli.no_config) {
            println!("{}", line);
        }
        println!();
        println!("{}", toml::to_string_pretty(&redacted(&config))?);
        return Ok(ExitCode::SUCCESS);
    }

    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("Config error: {}", issue);
        }
        bail!("invalid configuration ({} problem(s))", issues.len());
    }

    let location = cli.location.clone().unwrap_or_default();
    if location.trim().is_empty() {
        eprintln!("error: the location must not be empty (e.g. \"Austin, TX\")");
        return Ok(ExitCode::from(EXIT_USAGE));
    }

    let requested = config
        .model
        .parse_model()
        .context("model.name must not be empty")?;
    // A model named on the command line is never swapped for another provider's
    let selection = select_model(&config, requested, cli.model_override().is_some())?;
    if let Some(original) = &selection.switched_from {
        warn!(
            "{} has no API key for its provider, falling back to {}",
            original, selection.model
        );
    }
    let model = selection.model;
    let output = OutputConfig::resolve(&cli, config.output.format, &config.output.directory);

    // === Dependency Injection ===
    let gateway = Arc::new(build_gateway(&config, &model)?);
    info!("Providers available: {:?}", gateway.provider_kinds());

    let mut use_case = RunResearchUseCase::new(gateway).with_params(config.execution_params());
    if let Some(path) = &cli.log_file {
        let logger = JsonlConversationLogger::create(path)
            .with_context(|| format!("cannot create transcript file {}", path.display()))?;
        info!("Writing transcript to {}", logger.path().display());
        use_case = use_case.with_conversation_logger(Arc::new(logger) as Arc<dyn ConversationLogger>);
    }

    let input = RunResearchInput::new(location.trim(), model.clone());

    let outcome = if output.show_progress {
        if let Some(parsed) = foodtruck_domain::Location::try_new(location.trim()) {
            eprintln!(
                "{}",
                ConsoleFormatter::header(&parsed, &model, config.model.temperature)
            );
        }
        // Spinners only make sense on a terminal; logs and pipes get plain lines
        let progress: Box<dyn ProgressNotifier> = if std::io::stderr().is_terminal() {
            Box::new(ProgressReporter::new())
        } else {
            Box::new(SimpleProgress)
        };
        use_case.execute_with_progress(input, progress.as_ref()).await?
    } else {
        use_case.execute(input).await?
    };

    let state = outcome.state();
    let report = ReportRenderer::render(state, output.format);
    println!("{}", report);

    if output.show_progress {
        eprint!("{}", ConsoleFormatter::summary(state, &outcome.degraded_stages()));
    }

    let status = exit_status(&outcome);
    if status != 0 {
        return Ok(ExitCode::from(status));
    }

    if output.save {
        let writer = ReportWriter::new(&output.directory);
        match writer.write(state.location(), output.format, &report) {
            Ok(path) => eprintln!("{}", ConsoleFormatter::saved(&path)),
            Err(e) => {
                warn!("Failed to save report: {}", e);
                bail!(
                    "failed to save report to {}: {}",
                    writer.directory().display(),
                    e
                );
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Process status for a finished run
fn exit_status(outcome: &PipelineOutcome) -> u8 {
    if outcome.is_success() {
        0
    } else {
        EXIT_PIPELINE_FAILED
    }
}

/// Copy of the configuration with explicit API keys masked
fn redacted(config: &FileConfig) -> FileConfig {
    let mut config = config.clone();
    for key in [
        &mut config.providers.anthropic.api_key,
        &mut config.providers.openai.api_key,
    ] {
        if key.is_some() {
            *key = Some("<redacted>".to_string());
        }
    }
    config
}
