use anyhow::Context;
use clap::Parser;
use durianleaf::cli::{Cli, Command};
use durianleaf::{edu, ApiClient, App, Config, HistoryEntry, LogId, Preview, RasterCanvas};
use durianleaf::{TerminalView, UiError, View};
use image::{DynamicImage, RgbaImage};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

type TermApp = App<TerminalView, RasterCanvas>;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        // Already shown in the error banner.
        Err(e) if e.downcast_ref::<UiError>().is_some() => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from(&cli);
    tracing::debug!(?config, "configuration resolved");

    let api = ApiClient::new(&config.base_url)?;
    if let Some(cookies) = config.load_session() {
        api.restore_session(&cookies);
    }

    let canvas = match &config.font {
        Some(path) => RasterCanvas::new().with_font_file(path)?,
        None => RasterCanvas::new(),
    };
    let preview = Preview::new(canvas, config.viewport_width);
    let mut app = App::new(api, TerminalView::new(config.base_url.clone()), preview);

    let outcome = dispatch(&mut app, cli.command).await;

    if let Err(e) = config.save_session(app.api().session_cookies().as_deref()) {
        tracing::warn!(error = %e, "could not save session file");
    }
    outcome
}

async fn dispatch(app: &mut TermApp, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Detect {
            image,
            out,
            edu,
            pdf,
        } => {
            app.select_file(Some(image)).await?;
            app.detect().await?;
            if let Some(out) = out {
                save_preview(app, &out)?;
            }
            if edu {
                app.open_edu()?;
            }
            if let Some(pdf) = pdf {
                app.download_pdf()?;
                let id = app
                    .state()
                    .last_log_id
                    .clone()
                    .context("detection was not logged")?;
                download_pdf(app, &id, &pdf).await?;
            }
        }
        Command::History => app.load_history().await,
        Command::Stats => app.load_stats().await,
        Command::Show { id, out } => {
            let entry = HistoryEntry {
                id: Some(LogId::new(id)),
                ..HistoryEntry::default()
            };
            app.select_history_row(&entry).await?;
            save_preview(app, &out)?;
        }
        Command::Pdf { id, out } => {
            let out = out.unwrap_or_else(|| PathBuf::from(format!("laporan_{id}.pdf")));
            download_pdf(app, &LogId::new(id), &out).await?;
        }
        Command::ClearHistory => {
            app.clear_history().await?;
            println!("Riwayat dihapus.");
        }
        Command::Edu { label } => TerminalView::default().show_edu(&edu::lookup(&label)),
    }
    Ok(())
}

fn save_preview(app: &TermApp, out: &Path) -> anyhow::Result<()> {
    let frame = app
        .preview()
        .compose()
        .context("no image is shown in the preview")?;
    save_frame(frame, out)?;
    println!("Gambar disimpan: {}", out.display());
    Ok(())
}

fn save_frame(frame: RgbaImage, out: &Path) -> anyhow::Result<()> {
    let is_jpeg = out
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"));
    let image = DynamicImage::ImageRgba8(frame);
    let saved = if is_jpeg {
        image.to_rgb8().save(out)
    } else {
        image.save(out)
    };
    saved.with_context(|| format!("failed to write {}", out.display()))
}

async fn download_pdf(app: &TermApp, id: &LogId, out: &Path) -> anyhow::Result<()> {
    let bytes = app.api().export_pdf(id).await?;
    tokio::fs::write(out, bytes)
        .await
        .with_context(|| format!("failed to write {}", out.display()))?;
    println!("PDF disimpan: {}", out.display());
    Ok(())
}
