use std::fmt::Display;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::api::error::PlatformError;

/// Named resolution variant of a stream's preview thumbnail.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum PreviewSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl PreviewSize {
    pub const ALL: [PreviewSize; 3] = [PreviewSize::Small, PreviewSize::Medium, PreviewSize::Large];

    pub fn as_str(&self) -> &'static str {
        match self {
            PreviewSize::Small => "small",
            PreviewSize::Medium => "medium",
            PreviewSize::Large => "large",
        }
    }

    /// Pixel dimensions (width, height) of this variant.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            PreviewSize::Small => (80, 45),
            PreviewSize::Medium => (320, 180),
            PreviewSize::Large => (640, 360),
        }
    }
}

impl Display for PreviewSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PreviewSize {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "small" => Ok(PreviewSize::Small),
            "medium" => Ok(PreviewSize::Medium),
            "large" => Ok(PreviewSize::Large),
            other => Err(PlatformError::ValidationError(format!(
                "unknown preview size '{other}', expected small, medium or large"
            ))),
        }
    }
}

/// A stream that was live at the time of the poll. Never persisted.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct LiveStream {
    pub id: String,
    pub user_login: String,
    pub viewer_count: u64,
    // size label -> image url
    pub preview: FxHashMap<String, String>,
}

impl LiveStream {
    pub fn preview_url(&self, size: PreviewSize) -> Option<&str> {
        self.preview.get(size.as_str()).map(String::as_str)
    }
}
