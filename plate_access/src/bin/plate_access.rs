use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;

use plate_access::config::{
    Settings, CAMERA_INDEX, DEFAULT_LANGUAGE, DEFAULT_REGISTRY_PATH, DEFAULT_TESSDATA_DIR,
};
use plate_access::monitor::Monitor;
use plate_access::plate_detection::display::Window;
use plate_access::plate_detection::ocr_reader::TesseractReader;
use plate_access::plate_detection::video_reader::Camera;
use plate_access::registry::Registry;

#[derive(Parser)]
#[command(name = "plate_access")]
#[command(about = "Checks license plates seen by the camera against a whitelist", long_about = None)]
struct Cli {
    /// Spreadsheet with a "Placa" column listing the authorized plates
    #[arg(default_value = DEFAULT_REGISTRY_PATH)]
    registry: PathBuf,

    /// Directory holding the Tesseract traineddata files
    #[arg(long, default_value = DEFAULT_TESSDATA_DIR)]
    tessdata: String,

    /// OCR language
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    lang: String,

    /// Skip orientation detection
    #[arg(long)]
    no_angle_cls: bool,

    /// Show the edge map in a second window
    #[arg(long)]
    show_edges: bool,

    /// Log every detected fragment
    #[arg(short, long)]
    verbose: bool,
}

impl From<Cli> for Settings {
    fn from(cli: Cli) -> Self {
        Settings {
            registry_path: cli.registry,
            tessdata_dir: cli.tessdata,
            language: cli.lang,
            angle_cls: !cli.no_angle_cls,
            show_edges: cli.show_edges,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(filter)).init();
    let settings = Settings::from(cli);

    info!("Starting plate_access");
    let registry = Registry::load(&settings.registry_path);
    let reader = TesseractReader::new(
        &settings.tessdata_dir,
        &settings.language,
        settings.angle_cls,
    )
    .context("cannot initialize the OCR engine")?;

    let mut monitor = Monitor::new(registry, reader);
    if settings.show_edges {
        monitor = monitor.with_edges();
    }
    monitor
        .start(|| Camera::open(CAMERA_INDEX), Window::open)
        .context("the monitor stopped on an error")?;

    info!("Done");
    Ok(())
}
