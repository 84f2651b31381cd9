// ============================================================================
// overlayboard CLI - headless composition via command-line arguments
// ============================================================================
//
// Usage examples:
//   overlayboard --background bear.png --asset gugo-cap --asset gugo-chain --out renders/
//   overlayboard --identifier 1234 --settings settings.json --asset gugo-shades
//   overlayboard -b https://cdn.example/1234.png --catalog my-assets/catalog.json
//
// Loads run on the loader pool; the main thread waits for them, composes with
// each asset's default placement and writes one PNG.

use anyhow::{Context, Result, bail};
use clap::Parser;
use overlayboard::access::AccessGate;
use overlayboard::catalog::AssetCatalog;
use overlayboard::loader::ImageSource;
use overlayboard::settings::Settings;
use overlayboard::{Customizer, Notice};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const LOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Compose overlay assets onto a background and export a PNG.
#[derive(Parser, Debug)]
#[command(name = "overlayboard", version, about)]
struct CliArgs {
    /// Background image: a local path or an http(s) URL.
    #[arg(short, long, value_name = "PATH|URL")]
    background: Option<String>,

    /// Background identifier, resolved through the configured metadata API
    /// when no --background is given. Also names the output file.
    #[arg(short, long, value_name = "ID")]
    identifier: Option<String>,

    /// Catalog asset id to place (repeatable, in stacking order).
    #[arg(short, long = "asset", value_name = "ID")]
    assets: Vec<String>,

    /// JSON asset catalog replacing the built-in one.
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Settings file (defaults to the user config directory).
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Output directory.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    out: PathBuf,

    /// Print the asset catalog and exit.
    #[arg(long)]
    list_assets: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("overlayboard=info")))
        .init();

    let args = CliArgs::parse();

    let mut settings = match args.settings {
        Some(ref path) => Settings::load_from(path).with_context(|| format!("reading settings {}", path.display()))?,
        None => Settings::load(),
    };
    if let Some(ref catalog) = args.catalog {
        settings.catalog_path = Some(catalog.clone());
    }

    let mut customizer = Customizer::from_settings(settings)
        .context("initialising customizer")?
        .with_access_gate(AccessGate::open());

    if args.list_assets {
        list_catalog(customizer.catalog());
        return Ok(());
    }

    match (args.background.as_deref(), args.identifier.as_deref()) {
        (Some(background), identifier) => customizer
            .load_background_source(ImageSource::parse(background), identifier)
            .context("starting background load")?,
        (None, Some(identifier)) => customizer
            .load_background(identifier)
            .context("starting background lookup")?,
        (None, None) => bail!("either --background or --identifier is required"),
    }
    customizer.wait_idle(LOAD_TIMEOUT);
    report(&mut customizer)?;

    if !customizer.editor().scene().has_background() {
        bail!("background did not load");
    }

    // One at a time so layers stack in argument order
    for asset in &args.assets {
        customizer.add_asset(asset).with_context(|| format!("adding asset {}", asset))?;
        customizer.wait_idle(LOAD_TIMEOUT);
        report(&mut customizer)?;
    }

    let path = customizer.save(&args.out).context("exporting canvas")?;
    println!("{}", path.display());
    Ok(())
}

/// Print notices; any failure aborts the run.
fn report(customizer: &mut Customizer) -> Result<()> {
    for notice in customizer.drain_notices() {
        match notice {
            Notice::Failed { message } => bail!(message),
            Notice::AlreadyPresent { asset_id } => eprintln!("skipped {}: already placed", asset_id),
            other => tracing::info!(notice = ?other, "Done"),
        }
    }
    Ok(())
}

fn list_catalog(catalog: &AssetCatalog) {
    for asset in catalog.iter() {
        println!("{:<16} {}", asset.id, asset.display_name);
    }
}
