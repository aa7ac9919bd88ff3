//! Player configuration.

use common::color::Color;
use std::path::PathBuf;

/// Player configuration.
#[derive(Clone, Debug)]
pub struct PlayerConfig {
    /// Viewport width.
    pub viewport_width: u32,
    /// Viewport height.
    pub viewport_height: u32,
    /// Color the viewport is cleared to before each repaint.
    pub background: Color,
    /// Directory sprite sheets are loaded from.
    pub images_dir: Option<PathBuf>,
    /// Directory rendered frames are written to.
    pub output_dir: PathBuf,
    /// Stop after this many frames.
    pub max_frames: Option<u32>,
    /// Fail on a malformed batch instead of skipping it.
    pub strict: bool,
}

impl PlayerConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Small viewport on white, handy for checking a single sheet.
    pub fn preview() -> Self {
        Self {
            viewport_width: 320,
            viewport_height: 240,
            background: Color::WHITE,
            max_frames: Some(60),
            ..Self::default()
        }
    }

    /// 720p viewport.
    pub fn hd() -> Self {
        Self {
            viewport_width: 1280,
            viewport_height: 720,
            ..Self::default()
        }
    }

    /// Set viewport size.
    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set background color.
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Set images directory.
    pub fn with_images_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.images_dir = Some(dir.into());
        self
    }

    /// Set output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set frame limit.
    pub fn with_max_frames(mut self, max_frames: u32) -> Self {
        self.max_frames = Some(max_frames);
        self
    }

    /// Set strict mode.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            viewport_width: 640,
            viewport_height: 480,
            background: Color::BLACK,
            images_dir: None,
            output_dir: PathBuf::from("frames"),
            max_frames: None,
            strict: false,
        }
    }
}
