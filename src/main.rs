// ofview - A minimal image viewer core
// Opens a JPEG/PNG image, applies filters and optionally writes the result

use anyhow::{Context, Result};
use log::info;
use ofview::app::AppState;
use ofview::{cli, image_loader};

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command line arguments
    let args = cli::parse_args()?;

    let mut app = AppState::new(args.codec);

    info!(
        "Starting ofview with image: {:?}, output format: {}",
        args.image_path,
        app.codec().format
    );

    // Load the image
    if let Some(ref data) = args.image_data {
        let image =
            image_loader::load_from_bytes(data).context("Failed to decode image from stdin")?;
        app.show(image, None);
    } else if let Some(ref path) = args.image_path {
        app.open(path)
            .with_context(|| format!("Failed to open image: {}", path.display()))?;
    }

    if let Some(image) = app.image() {
        info!("Image loaded: {}x{} pixels", image.width(), image.height());
    }

    for filter in &args.filters {
        app.apply(*filter);
    }

    if let Some(ref output) = args.output {
        app.save(output)
            .with_context(|| format!("Failed to save image: {}", output.display()))?;
    }

    info!("{}", app.status());
    Ok(())
}
