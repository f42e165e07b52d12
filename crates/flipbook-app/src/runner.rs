//! Replays a script through the editor.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use flipbook_core::{Editor, EditorConfig, FileStorage, PlaybackFrame, blank_raster};
use kurbo::Point;

use crate::AppError;
use crate::script::{Script, Step};

/// Counts reported after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: usize,
    pub frames: usize,
    pub playback_images: usize,
}

/// Drives an [`Editor`] backed by PNG files.
///
/// Time is simulated: playback advances a private clock by exactly one
/// interval per tick.
pub struct Runner {
    editor: Editor<FileStorage>,
    out_dir: PathBuf,
    clock: Instant,
    playback_images: usize,
}

impl Runner {
    /// Playback images are written to `out_dir`.
    pub fn new(
        config: EditorConfig,
        storage: FileStorage,
        out_dir: &Path,
    ) -> Result<Self, AppError> {
        fs::create_dir_all(out_dir)?;
        Ok(Self {
            editor: Editor::new(config, storage)?,
            out_dir: out_dir.to_path_buf(),
            clock: Instant::now(),
            playback_images: 0,
        })
    }

    pub fn editor(&self) -> &Editor<FileStorage> {
        &self.editor
    }

    /// Apply every step, then save the frame being edited.
    pub fn run(&mut self, script: &Script) -> Result<RunSummary, AppError> {
        for (index, step) in script.steps.iter().enumerate() {
            log::debug!("Step {}: {:?}", index, step);
            self.apply(step)?;
        }
        self.editor.save_current_frame()?;
        Ok(RunSummary {
            steps: script.steps.len(),
            frames: self.editor.frames().len(),
            playback_images: self.playback_images,
        })
    }

    pub fn apply(&mut self, step: &Step) -> Result<(), AppError> {
        match step {
            Step::Pencil => self.editor.select_pencil(),
            Step::Eraser => self.editor.select_eraser(),
            Step::Brush { enabled } => {
                self.editor.set_brush_mode(*enabled);
                self.editor.select_pencil();
            }
            Step::Shape { instrument } => self.editor.select_shape(*instrument),
            Step::Color { color } => self.editor.pick_color(*color),
            Step::Width { width } => self.editor.set_width(*width),
            Step::Drag { points, cancel } => self.drag(points, *cancel),
            Step::Tap { x, y } => {
                self.editor.pointer_down(Point::new(*x, *y));
                self.editor.pointer_up();
            }
            Step::Undo => {
                if !self.editor.undo() {
                    log::info!("Nothing to undo");
                }
            }
            Step::Redo => {
                if !self.editor.redo() {
                    log::info!("Nothing to redo");
                }
            }
            Step::AddFrame => self.editor.add_frame()?,
            Step::DuplicateFrame => self.editor.duplicate_frame()?,
            Step::RemoveFrame => self.editor.remove_current_frame()?,
            Step::RemoveAllFrames => self.editor.remove_all_frames()?,
            Step::GoToFrame { index } => {
                self.editor.go_to_frame(*index)?;
            }
            Step::Generate { count } => {
                self.editor.generate_random_frames(*count)?;
                let added = self.editor.wait_for_generation()?;
                log::info!("Generated {} frames", added);
            }
            Step::Speed { speed } => {
                let shown = self.editor.set_playback_speed(*speed, self.clock)?;
                self.write_playback(shown)?;
            }
            Step::Play { ticks } => self.play(*ticks)?,
        }
        Ok(())
    }

    fn drag(&mut self, points: &[[f64; 2]], cancel: bool) {
        let mut points = points.iter().map(|&[x, y]| Point::new(x, y));
        let Some(first) = points.next() else {
            return;
        };
        self.editor.pointer_down(first);
        for point in points {
            self.editor.pointer_move(point);
        }
        if cancel {
            self.editor.pointer_cancel();
        } else {
            self.editor.pointer_up();
        }
    }

    fn play(&mut self, ticks: usize) -> Result<(), AppError> {
        let first = self.editor.play(self.clock)?;
        self.write_playback(first)?;

        let interval = self.editor.playback().interval();
        for _ in 0..ticks {
            self.clock += interval;
            let shown = self.editor.poll_playback(self.clock)?;
            self.write_playback(shown)?;
        }
        self.editor.pause();
        Ok(())
    }

    fn write_playback(&mut self, shown: Option<PlaybackFrame>) -> Result<(), AppError> {
        let Some(shown) = shown else {
            return Ok(());
        };
        let config = self.editor.config();
        let raster = match shown.raster {
            Some(raster) => raster,
            None => blank_raster(config.canvas_width, config.canvas_height)
                .ok_or_else(|| AppError::Render("empty canvas".to_string()))?,
        };

        let path = self
            .out_dir
            .join(format!("playback_{:04}.png", self.playback_images));
        raster
            .save_png(&path)
            .map_err(|e| AppError::Render(format!("Failed to write {}: {}", path.display(), e)))?;
        log::debug!("Frame {} ({}) -> {}", shown.index, shown.frame.id, path.display());
        self.playback_images += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flipbook_core::{Instrument, RasterStorage};
    use tempfile::tempdir;

    fn config() -> EditorConfig {
        EditorConfig {
            canvas_width: 48,
            canvas_height: 32,
            ..EditorConfig::default()
        }
    }

    fn runner(out: &Path) -> Runner {
        let storage = FileStorage::new(out.join("frames")).unwrap();
        Runner::new(config(), storage, out).unwrap()
    }

    fn drag(points: &[[f64; 2]]) -> Step {
        Step::Drag {
            points: points.to_vec(),
            cancel: false,
        }
    }

    #[test]
    fn test_run_renders_playback() {
        let dir = tempdir().unwrap();
        let mut runner = runner(dir.path());
        let script = Script {
            steps: vec![
                drag(&[[2.0, 2.0], [20.0, 20.0]]),
                Step::AddFrame,
                Step::Shape { instrument: Instrument::Square },
                drag(&[[5.0, 5.0], [15.0, 15.0], [25.0, 25.0]]),
                Step::Play { ticks: 3 },
            ],
        };

        let summary = runner.run(&script).unwrap();
        assert_eq!(summary.frames, 2);
        assert_eq!(summary.playback_images, 4);
        for n in 0..4 {
            assert!(dir.path().join(format!("playback_{:04}.png", n)).exists());
        }
        assert_eq!(runner.editor().storage().list().unwrap().len(), 2);
    }

    #[test]
    fn test_undo_and_cancel_steps() {
        let dir = tempdir().unwrap();
        let mut runner = runner(dir.path());
        runner.apply(&drag(&[[1.0, 1.0], [9.0, 9.0]])).unwrap();
        runner.apply(&Step::Undo).unwrap();
        assert!(runner.editor().canvas().unwrap().is_empty());

        runner.apply(&Step::Shape { instrument: Instrument::Line }).unwrap();
        runner
            .apply(&Step::Drag {
                points: vec![[1.0, 1.0], [30.0, 1.0]],
                cancel: true,
            })
            .unwrap();
        assert!(runner.editor().canvas().unwrap().is_empty());
        assert!(runner.editor().canvas().unwrap().preview().is_none());
    }

    #[test]
    fn test_generate_step() {
        let dir = tempdir().unwrap();
        let mut runner = runner(dir.path());
        runner.apply(&Step::Generate { count: 2 }).unwrap();

        assert_eq!(runner.editor().frames().len(), 3);
        assert_eq!(runner.editor().frame_label(), "3 / 3");
    }

    #[test]
    fn test_bad_frame_index_is_error() {
        let dir = tempdir().unwrap();
        let mut runner = runner(dir.path());
        assert!(matches!(
            runner.apply(&Step::GoToFrame { index: 5 }),
            Err(AppError::Editor(_))
        ));
    }
}
