use std::path::PathBuf;

/// Source image read by the runner. Overridable only at build time.
pub const SOURCE_PATH: &str = match option_env!("BG_CUTOUT_SOURCE") {
    Some(path) => path,
    None => "bird_fixed_transparent.png",
};

/// Destination of the cut-out image. Overridable only at build time.
pub const DESTINATION_PATH: &str = match option_env!("BG_CUTOUT_DESTINATION") {
    Some(path) => path,
    None => "bird_clean.png",
};

const MODEL_PATH: Option<&str> = option_env!("BG_CUTOUT_MODEL");
const MODEL_DIR: &str = ".u2net";
const MODEL_FILE: &str = "u2net.onnx";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
    pub model_path: PathBuf,
}

impl Config {
    pub fn new(
        source_path: impl Into<PathBuf>,
        destination_path: impl Into<PathBuf>,
        model_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            destination_path: destination_path.into(),
            model_path: model_path.into(),
        }
    }

    /// Paths baked into the binary.
    pub fn compiled() -> Self {
        Self::new(SOURCE_PATH, DESTINATION_PATH, default_model_path())
    }
}

/// `~/.u2net/u2net.onnx`, falling back to the working directory when no home
/// directory can be resolved.
fn default_model_path() -> PathBuf {
    if let Some(path) = MODEL_PATH {
        return PathBuf::from(path);
    }
    dirs::home_dir()
        .map(|home| home.join(MODEL_DIR))
        .unwrap_or_else(|| PathBuf::from(MODEL_DIR))
        .join(MODEL_FILE)
}
