use std::path::PathBuf;

/// Diamond table read at start-up.
pub const DEFAULT_DATA_PATH: &str = "cleaned_diamonds.csv";
/// Pre-rendered correlation heatmap shown on the correlation page.
pub const DEFAULT_IMAGE_PATH: &str = "korrelationsmatris.png";

/// Start-up configuration: `diamond-explorer [data_path] [image_path]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub image_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            image_path: PathBuf::from(DEFAULT_IMAGE_PATH),
        }
    }
}

impl AppConfig {
    /// Positional overrides; missing arguments keep their defaults.
    pub fn from_args(args: impl IntoIterator<Item = String>) -> Self {
        let mut args = args.into_iter();
        let mut config = Self::default();
        if let Some(data) = args.next() {
            config.data_path = PathBuf::from(data);
        }
        if let Some(image) = args.next() {
            config.image_path = PathBuf::from(image);
        }
        config
    }
}
