//! Application entry point — Textbook Aide CLI.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Parse CLI arguments.
//! 3. Load [`AppConfig`] from disk (returns default on first run).
//! 4. Resolve the service credential and build the [`GeminiClient`].
//! 5. Build the [`GenerationOrchestrator`] and [`StateController`].
//! 6. Upload the image, then run the requested actions in order:
//!    quiz → PDF export → speech.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;

use textbook_aide::{
    app::StateController,
    config::AppConfig,
    export::{FontSource, PdfExporter},
    gemini::{GeminiClient, GenerativeClient},
    input::PageImage,
    locale::Language,
    pipeline::GenerationOrchestrator,
};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Generate a quiz or spoken audio from a photo of a textbook page.
#[derive(Debug, Parser)]
#[command(name = "textbook-aide", version, about)]
struct Cli {
    /// Image of the textbook page (png, jpg, webp, gif, bmp).
    image: PathBuf,

    /// Content language: en or ml.  Defaults to the configured language.
    #[arg(short, long)]
    language: Option<Language>,

    /// Generate a quiz (default action when nothing else is selected).
    #[arg(long)]
    quiz: bool,

    /// Export the generated quiz as a PDF (implies --quiz).
    #[arg(long)]
    pdf: bool,

    /// Generate a spoken-audio WAV of the page text.
    #[arg(long)]
    speech: bool,

    /// Output directory for generated files.  Defaults to the configured
    /// directory, then the current directory.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Explicit settings file instead of the platform default.
    #[arg(long)]
    config: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 2. CLI
    let cli = Cli::parse();
    let want_quiz = cli.quiz || cli.pdf || !cli.speech;
    let want_speech = cli.speech;

    // 3. Configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AppConfig::load().unwrap_or_else(|e| {
            log::warn!("Failed to load config ({e}); using defaults");
            AppConfig::default()
        }),
    };

    let language = cli.language.unwrap_or(config.language);
    let strings = language.strings();
    log::info!("{} — {}", strings.title, strings.subtitle);

    let output_dir = cli
        .output
        .or_else(|| config.export.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    // 4. Service client (explicit construction, injected credential)
    let api_key = config.service.resolve_api_key()?;
    let client: Arc<dyn GenerativeClient> = Arc::new(GeminiClient::new(&config.service, api_key));

    // 5. Orchestrator + controller
    let orchestrator = GenerationOrchestrator::new(client, config.audio);
    let mut controller = StateController::new(language);

    // 6. Upload, then run the requested actions.
    let image = PageImage::from_path(&cli.image)
        .with_context(|| format!("cannot use {}", cli.image.display()))?;
    controller.upload_image(image);

    if want_quiz {
        controller.request_quiz(&orchestrator).await;
        if let Some(message) = &controller.state().error {
            bail!("{message}");
        }

        println!("\n{}\n", strings.quiz_title);
        for (i, item) in controller.state().quiz.iter().enumerate() {
            println!("{:>2}. {}: {}", i + 1, strings.question, item.question);
            println!("    {}: {}\n", strings.answer, item.answer);
        }

        if cli.pdf {
            let exporter =
                PdfExporter::new(output_dir.clone(), FontSource::from_config(&config.export));
            match controller.request_pdf_export(&exporter).await {
                Some(Ok(path)) => println!("{}: {}", strings.download_pdf, path.display()),
                Some(Err(e)) => return Err(e).context("PDF export failed"),
                None => {}
            }
        }
    }

    if want_speech {
        controller.request_audio(&orchestrator).await;
        if let Some(message) = &controller.state().error {
            bail!("{message}");
        }

        if let Some(mut artifact) = controller.take_audio() {
            std::fs::create_dir_all(&output_dir)
                .with_context(|| format!("cannot create {}", output_dir.display()))?;
            let duration = artifact.duration_secs();
            artifact
                .persist(&output_dir)
                .context("could not write the audio file")?;
            // The deliverable outlives the process: detach it from cleanup.
            if let Some(path) = artifact.keep() {
                println!("{}: {} ({duration:.1}s)", strings.generate_audio, path.display());
            }
        }
    }

    Ok(())
}
