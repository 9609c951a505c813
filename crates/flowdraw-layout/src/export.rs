use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

pub const DEFAULT_JPEG_QUALITY: u8 = 92;
const FILE_PREFIX: &str = "flowdraw";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn supports_alpha(self) -> bool {
        matches!(self, ImageFormat::Png)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageExportOptions {
    pub format: ImageFormat,
    pub transparent_background: bool,
    pub show_grid: bool,
    pub grid_size: f64,
    pub device_pixel_ratio: f64,
    pub jpeg_quality: u8,
}

impl Default for ImageExportOptions {
    fn default() -> Self {
        Self {
            format: ImageFormat::Png,
            transparent_background: false,
            show_grid: true,
            grid_size: 20.0,
            device_pixel_ratio: 1.0,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl ImageExportOptions {
    pub fn normalized(&self) -> Self {
        let mut options = self.clone();
        if !options.format.supports_alpha() {
            options.transparent_background = false;
        }
        options.jpeg_quality = options.jpeg_quality.clamp(1, 100);
        options
    }

    pub fn density_scale(&self) -> f64 {
        if self.device_pixel_ratio > 1.0 {
            2.0
        } else {
            1.0
        }
    }
}

pub fn export_file_name<Tz>(format: ImageFormat, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{FILE_PREFIX}-{}.{}",
        at.format("%Y%m%d-%H%M%S"),
        format.extension()
    )
}
