//! Sprite replay player.
//!
//! Applies a stream of shape record batches to a scene and renders one frame
//! per batch into PNG files.

pub mod config;

pub use config::PlayerConfig;

use canvas::{Bitmap, CanvasContext2D};
use common::error::SceneResult;
use scene::{DrawStats, RecordStream, Scene, ShapeRecord};
use std::io::BufRead;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Player version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Drives a scene from record batches and renders it to a viewport.
pub struct Player {
    config: PlayerConfig,
    scene: Scene,
    viewport: CanvasContext2D,
    frames_rendered: u32,
}

impl Player {
    pub fn new(config: PlayerConfig) -> Self {
        let mut viewport = CanvasContext2D::new(config.viewport_width, config.viewport_height);
        viewport.clear(config.background);

        Self {
            config,
            scene: Scene::new(),
            viewport,
            frames_rendered: 0,
        }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Load the configured images directory into the scene's registry.
    ///
    /// Images have to be loaded before the first batch is applied, since
    /// shapes look their image up when they are reconstructed.
    pub fn load_images(&mut self) -> SceneResult<usize> {
        let Some(dir) = self.config.images_dir.clone() else {
            return Ok(0);
        };

        let loaded = self.scene.registry_mut().load_directory(&dir)?;
        info!("Loaded {} images from {}", loaded, dir.display());
        Ok(loaded)
    }

    pub fn apply_batch(&mut self, records: &[ShapeRecord]) {
        debug!("applying batch of {} records", records.len());
        self.scene.apply_batch(records);
    }

    /// Repaint the viewport if anything changed.
    ///
    /// Shapes overlap, so a change repaints the whole scene over a cleared
    /// background rather than only the dirty shapes.
    pub fn render(&mut self) -> DrawStats {
        if !self.scene.needs_redraw() {
            return DrawStats::default();
        }

        self.viewport.clear(self.config.background);
        self.scene.mark_all_dirty();
        let stats = self.scene.draw(&mut self.viewport, None);
        if stats.shapes_failed > 0 {
            warn!("{} shapes could not be drawn", stats.shapes_failed);
        }
        stats
    }

    /// The current viewport contents.
    pub fn frame(&self) -> &Bitmap {
        self.viewport.bitmap()
    }

    pub fn frames_rendered(&self) -> u32 {
        self.frames_rendered
    }

    /// Path of the PNG for frame `index`.
    pub fn frame_path(&self, index: u32) -> PathBuf {
        self.config.output_dir.join(format!("frame_{:04}.png", index))
    }

    /// Replay every batch from `reader`, writing one PNG per batch.
    ///
    /// Returns the number of frames written. Malformed batches are skipped
    /// with a warning unless the player is strict.
    pub fn run<R: BufRead>(&mut self, reader: R) -> SceneResult<u32> {
        std::fs::create_dir_all(&self.config.output_dir)?;

        let mut stream = RecordStream::new(reader);
        while let Some(batch) = stream.next() {
            if self.config.max_frames.is_some_and(|max| self.frames_rendered >= max) {
                info!("Frame limit reached at line {}", stream.line_number());
                break;
            }

            let records = match batch {
                Ok(records) => records,
                Err(err) if !self.config.strict => {
                    warn!("skipping batch: {}", err);
                    continue;
                }
                Err(err) => return Err(err),
            };

            self.apply_batch(&records);
            self.render();

            let path = self.frame_path(self.frames_rendered);
            self.frame().save_png(&path)?;
            debug!("wrote {}", path.display());
            self.frames_rendered += 1;
        }

        Ok(self.frames_rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::color::Color;
    use std::io::Cursor;

    /// 4x2 sheet: left 2x2 cell red, right cell blue.
    fn write_sheet(dir: &std::path::Path) {
        let mut sheet = Bitmap::solid(4, 2, Color::RED);
        for y in 0..2 {
            for x in 2..4 {
                sheet.set_pixel(x, y, Color::BLUE);
            }
        }
        sheet.save_png(dir.join("hero.png")).unwrap();
    }

    fn player(images: &tempfile::TempDir, output: &tempfile::TempDir) -> Player {
        let config = PlayerConfig::new()
            .with_viewport(4, 4)
            .with_images_dir(images.path())
            .with_output_dir(output.path());
        let mut player = Player::new(config);
        assert_eq!(player.load_images().unwrap(), 1);
        player
    }

    #[test]
    fn test_run_writes_a_frame_per_batch() {
        let images = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_sheet(images.path());
        let mut player = player(&images, &output);

        let input = concat!(
            r#"[[1, "hero", [0, 0, "-1", "-1"], false, 2, 1, 0, 0]]"#,
            "\n",
            r#"[[1, "hero", [0, 0, "-1", "-1"], false, 2, 1, 1, 0]]"#,
            "\n",
        );
        assert_eq!(player.run(Cursor::new(input)).unwrap(), 2);

        let first = Bitmap::open(output.path().join("frame_0000.png")).unwrap();
        assert_eq!(first.get_pixel(0, 0), Color::RED);
        assert_eq!(first.get_pixel(3, 3), Color::BLACK);

        let second = Bitmap::open(output.path().join("frame_0001.png")).unwrap();
        assert_eq!(second.get_pixel(1, 1), Color::BLUE);
        // Native size: nothing drawn outside the 2x2 cell
        assert_eq!(second.get_pixel(2, 0), Color::BLACK);
    }

    #[test]
    fn test_tint_change_repaints() {
        let images = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_sheet(images.path());
        let mut player = player(&images, &output);

        let batch = scene::codec::decode_batch(r#"[[1, "hero", [0, 0, 4, 4], true, 2, 1, 0, 0]]"#).unwrap();
        player.apply_batch(&batch);
        assert_eq!(player.render().shapes_drawn, 1);
        assert_eq!(player.frame().get_pixel(3, 3), Color::RED);

        // Unchanged scene: nothing to draw
        player.apply_batch(&batch);
        assert_eq!(player.render(), DrawStats::default());

        let mut tinted = batch.clone();
        tinted[0].color = Color::GREEN;
        player.apply_batch(&tinted);
        player.render();
        assert_eq!(player.frame().get_pixel(3, 3), Color::GREEN);
    }

    #[test]
    fn test_malformed_batches() {
        let images = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_sheet(images.path());
        let input = "oops\n[]\n";

        let mut lenient = player(&images, &output);
        assert_eq!(lenient.run(Cursor::new(input)).unwrap(), 1);

        let mut strict = player(&images, &output);
        strict.config.strict = true;
        assert!(strict.run(Cursor::new(input)).is_err());
    }

    #[test]
    fn test_frame_limit() {
        let images = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_sheet(images.path());
        let mut player = player(&images, &output);
        player.config.max_frames = Some(2);

        assert_eq!(player.run(Cursor::new("[]\n[]\n[]\n")).unwrap(), 2);
        assert!(!player.frame_path(2).exists());
        assert_eq!(player.frames_rendered(), 2);
    }

    #[test]
    fn test_without_images_dir() {
        let mut player = Player::new(PlayerConfig::new().with_viewport(2, 2));
        assert_eq!(player.load_images().unwrap(), 0);
        assert!(player.scene().registry().is_empty());
        assert_eq!(player.frame().get_pixel(0, 0), Color::BLACK);
    }
}
