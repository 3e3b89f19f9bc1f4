use std::path::PathBuf;

/// CLI configuration, loaded from environment variables.
pub struct Config {
    /// Path to the YOLOv8 ingredient model ONNX export.
    pub model_path: PathBuf,
    /// Path to the JSON class-label sidecar.
    pub labels_path: PathBuf,
    /// Path to the recipe catalog JSON; `None` uses the embedded starter catalog.
    pub catalog_path: Option<PathBuf>,
    /// Minimum class score for a detection to count.
    pub confidence_threshold: f32,
    /// IoU threshold for NMS.
    pub nms_threshold: f32,
}

impl Config {
    /// Load configuration from `FOODGENIE_*` environment variables with defaults.
    pub fn from_env() -> Self {
        let data_dir = std::env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
                PathBuf::from(home).join(".local/share")
            })
            .join("foodgenie");

        let model_path = std::env::var("FOODGENIE_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("ingredients.onnx"));

        let labels_path = std::env::var("FOODGENIE_LABELS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("labels.json"));

        Self {
            model_path,
            labels_path,
            catalog_path: std::env::var("FOODGENIE_CATALOG_PATH").ok().map(PathBuf::from),
            confidence_threshold: env_f32("FOODGENIE_CONFIDENCE_THRESHOLD", 0.25),
            nms_threshold: env_f32("FOODGENIE_NMS_THRESHOLD", 0.45),
        }
    }

    pub fn model_path_str(&self) -> String {
        self.model_path.to_string_lossy().into_owned()
    }

    pub fn labels_path_str(&self) -> String {
        self.labels_path.to_string_lossy().into_owned()
    }
}

fn env_f32(key: &str, default: f32) -> f32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
