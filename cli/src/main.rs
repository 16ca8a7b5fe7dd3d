use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use canvas::export::{ExportError, export_region};
use canvas::geometry::{Rect, compute_bounding_box_with};
use canvas::render::{RenderError, draw_regions};
use canvas::surface::{DrawingSurface, InkSurface, SurfaceDocument};
use clap::{Args, Parser, Subcommand};
use feedback::identity::StaticIdentity;
use feedback::{
    ErrorCode, FeedbackConfig, FeedbackError, FeedbackOrchestrator, HttpFeedbackClient, OrchestratorSettings,
    Overlay, SubmitOutcome,
};
use serde_json::{Value, json};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: std::io::Error },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error(transparent)]
    Feedback(#[from] FeedbackError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("the submission was cancelled before it finished")]
    Discarded,
}

impl ErrorCode for CliError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Read { .. } => "E_READ",
            Self::Write { .. } => "E_WRITE",
            Self::InvalidJson(_) => "E_INVALID_JSON",
            Self::Feedback(e) => e.error_code(),
            Self::Export(_) => "E_EXPORT",
            Self::Render(_) => "E_RENDER",
            Self::Discarded => "E_DISCARDED",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Feedback(e) => e.retryable(),
            Self::Discarded => true,
            _ => false,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "inkcheck", about = "Handwritten math feedback from the command line")]
struct Cli {
    /// Feedback service base URL, e.g. `http://127.0.0.1:8000/api/v1`.
    #[arg(long, env = "FEEDBACK_API_BASE_URL")]
    base_url: Option<String>,

    /// Bearer token for the signed-in user.
    #[arg(long, env = "FEEDBACK_ID_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the padded bounding box of all ink.
    Bounds {
        document: PathBuf,
    },
    /// Crop a region of the surface to a PNG.
    Export {
        document: PathBuf,
        #[arg(long, value_parser = parse_rect, allow_hyphen_values = true)]
        rect: Rect,
        #[arg(long)]
        out: PathBuf,
    },
    /// Run a full submission cycle against the feedback service.
    Submit(SubmitArgs),
}

#[derive(Args, Debug)]
struct SubmitArgs {
    document: PathBuf,

    /// Region to submit; defaults to the padded bounding box.
    #[arg(long, value_parser = parse_rect, allow_hyphen_values = true, conflicts_with = "all")]
    rect: Option<Rect>,

    /// Submit the whole surface.
    #[arg(long, default_value_t = false)]
    all: bool,

    /// Write the full drawing with error regions highlighted.
    #[arg(long)]
    overlay: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt::init();
    // Missing .env is fine; real env vars still apply.
    if let Err(e) = dotenv {
        if !e.not_found() {
            tracing::warn!(error = %e, "inkcheck: failed to load .env");
        }
    }

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", failure_line(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = FeedbackConfig::from_env()?;
    if let Some(url) = cli.base_url {
        config.api_base_url = url.trim_end_matches('/').to_owned();
    }
    if cli.token.is_some() {
        config.id_token = cli.token.filter(|t| !t.trim().is_empty());
    }

    match cli.command {
        Command::Bounds { document } => run_bounds(&config, &document),
        Command::Export { document, rect, out } => run_export(&document, rect, &out),
        Command::Submit(args) => run_submit(config, args).await,
    }
}

/// One-line stderr report: `error[E_CODE]: message`, flagged when a retry may help.
fn failure_line(err: &CliError) -> String {
    let retry = if err.retryable() { " (retryable)" } else { "" };
    format!("error[{}]: {err}{retry}", err.error_code())
}

fn run_bounds(config: &FeedbackConfig, document: &Path) -> Result<(), CliError> {
    let surface = load_surface(document)?;
    let bbox = compute_bounding_box_with(&surface.committed_strokes(), &config.bounds);
    print_json(&json!({ "bounding_box": bbox }))
}

fn run_export(document: &Path, rect: Rect, out: &Path) -> Result<(), CliError> {
    let surface = load_surface(document)?;
    let export = export_region(&surface, rect)?;
    write_file(out, &export.image)?;
    print_json(&json!({
        "bounds": export.bounds,
        "pixel_width": export.pixel_width,
        "pixel_height": export.pixel_height,
        "out": out,
    }))
}

async fn run_submit(config: FeedbackConfig, args: SubmitArgs) -> Result<(), CliError> {
    let surface = Arc::new(load_surface(&args.document)?);
    let client = HttpFeedbackClient::from_config(&config)?;
    tracing::info!(url = client.url(), "inkcheck: submitting");
    let orchestrator = FeedbackOrchestrator::new(
        surface.clone(),
        Arc::new(client),
        Arc::new(StaticIdentity::from_token(config.id_token.clone())),
        OrchestratorSettings::from_config(&config),
    );

    let mut phases = orchestrator.subscribe();
    tokio::spawn(async move {
        while phases.changed().await.is_ok() {
            let phase = phases.borrow_and_update().phase;
            tracing::debug!(?phase, "inkcheck: phase changed");
        }
    });

    let outcome = if args.all {
        orchestrator.submit_all().await?
    } else {
        orchestrator.request_feedback()?;
        if let Some(rect) = args.rect {
            orchestrator.replace_selection(rect);
        }
        orchestrator.confirm().await?
    };
    let SubmitOutcome::Completed(overlay) = outcome else {
        return Err(CliError::Discarded);
    };

    if let Some(path) = &args.overlay {
        let raster = surface.export_full_raster()?;
        write_file(path, &draw_regions(&raster, &overlay.regions)?)?;
    }
    print_json(&overlay_json(&overlay))
}

fn overlay_json(overlay: &Overlay) -> Value {
    json!({
        "correct": overlay.is_correct(),
        "crop": overlay.crop,
        "translated_handwriting": overlay.translated_handwriting,
        "ocr_text": overlay.ocr_text,
        "ai_feedback": overlay.ai_feedback,
        "image_gcs_url": overlay.image_gcs_url,
        "errors": overlay.regions,
    })
}

fn load_surface(path: &Path) -> Result<InkSurface, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_owned(), source })?;
    let doc: SurfaceDocument = serde_json::from_str(&raw)?;
    Ok(InkSurface::from_document(doc))
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    std::fs::write(path, bytes).map_err(|source| CliError::Write { path: path.to_owned(), source })
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

/// Parse `x,y,w,h` in surface units.
fn parse_rect(raw: &str) -> Result<Rect, String> {
    let parts: Vec<f64> = raw
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| format!("`{p}`: {e}")))
        .collect::<Result<_, _>>()?;
    let &[x, y, width, height] = parts.as_slice() else {
        return Err(format!("expected x,y,w,h, got {} values", parts.len()));
    };
    let rect = Rect::new(x, y, width, height);
    if !rect.is_finite() || !rect.has_area() {
        return Err("rect must be finite with positive width and height".to_owned());
    }
    Ok(rect)
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
