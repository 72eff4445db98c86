use std::path::PathBuf;

pub const CAMERA_INDEX: i32 = 0;
pub const CAPTURE_WIDTH: f64 = 1280.0;
pub const CAPTURE_HEIGHT: f64 = 720.0;
pub const CAPTURE_FPS: f64 = 30.0;

pub const DISPLAY_WIDTH: i32 = 800;
pub const DISPLAY_HEIGHT: i32 = 600;
pub const WINDOW_TITLE: &str = "License Plate Recognition";
pub const EDGES_WINDOW_TITLE: &str = "Edges";
pub const QUIT_KEY: char = 'q';

/// Shortest text the plate-like filter accepts, in characters.
pub const MIN_PLATE_LEN: usize = 6;
pub const REGISTRY_COLUMN: &str = "Placa";

pub const DEFAULT_REGISTRY_PATH: &str = "DBplacas.xlsx";
pub const DEFAULT_TESSDATA_DIR: &str = "models";
pub const DEFAULT_LANGUAGE: &str = "eng";

/// Process-level knobs. Camera and detection thresholds stay constants.
#[derive(Debug, Clone)]
pub struct Settings {
    pub registry_path: PathBuf,
    pub tessdata_dir: String,
    pub language: String,
    pub angle_cls: bool,
    pub show_edges: bool,
}
