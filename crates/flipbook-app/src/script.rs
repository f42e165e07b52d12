//! Gesture scripts: a JSON list of editor actions.
//!
//! ```json
//! { "steps": [
//!     { "step": "shape", "instrument": "circle" },
//!     { "step": "drag", "points": [[10, 10], [60, 40]] },
//!     { "step": "add_frame" },
//!     { "step": "play", "ticks": 8 }
//! ] }
//! ```

use std::path::Path;

use flipbook_core::{ColorRgba, Instrument};
use serde::{Deserialize, Serialize};

use crate::AppError;

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    Pencil,
    Eraser,
    Brush {
        #[serde(default = "enabled")]
        enabled: bool,
    },
    Shape {
        instrument: Instrument,
    },
    Color {
        color: ColorRgba,
    },
    Width {
        width: f64,
    },
    /// Pointer down on the first point, moves through the rest, pointer up.
    Drag {
        points: Vec<[f64; 2]>,
        #[serde(default)]
        cancel: bool,
    },
    Tap {
        x: f64,
        y: f64,
    },
    Undo,
    Redo,
    AddFrame,
    DuplicateFrame,
    RemoveFrame,
    RemoveAllFrames,
    GoToFrame {
        index: usize,
    },
    Generate {
        count: usize,
    },
    Speed {
        speed: f64,
    },
    /// Play from the first frame for `ticks` timer ticks, then pause.
    Play {
        ticks: usize,
    },
}

fn enabled() -> bool {
    true
}

/// A whole script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        serde_json::from_str(json).map_err(|e| AppError::Script(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            AppError::Script(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        let script = Script::from_json(
            r#"{ "steps": [
                { "step": "pencil" },
                { "step": "brush" },
                { "step": "shape", "instrument": "arrow" },
                { "step": "color", "color": { "r": 1, "g": 2, "b": 3, "a": 255 } },
                { "step": "drag", "points": [[0, 0], [5, 5]] },
                { "step": "go_to_frame", "index": 2 },
                { "step": "play", "ticks": 4 }
            ] }"#,
        )
        .unwrap();

        assert_eq!(
            script.steps,
            vec![
                Step::Pencil,
                Step::Brush { enabled: true },
                Step::Shape { instrument: Instrument::Arrow },
                Step::Color { color: ColorRgba::new(1, 2, 3, 255) },
                Step::Drag { points: vec![[0.0, 0.0], [5.0, 5.0]], cancel: false },
                Step::GoToFrame { index: 2 },
                Step::Play { ticks: 4 },
            ]
        );
    }

    #[test]
    fn test_unknown_step_rejected() {
        let result = Script::from_json(r#"{ "steps": [ { "step": "explode" } ] }"#);
        assert!(matches!(result, Err(AppError::Script(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Script::load(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(AppError::Script(_))));
    }
}
