//! Bulk procedural frame generation on a background thread.
//!
//! The worker only touches the geometry kernel and its own raster per frame.
//! Finished frames travel back over a channel; the receiving side polls with
//! [`GenerationHandle::try_next`] from its event loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use kurbo::Point;
use peniko::Color;
use tiny_skia::Pixmap;

use crate::frames::Frame;
use crate::layer::Layer;
use crate::random::SplitMix64;
use crate::render::blank_raster;
use crate::style::Style;
use crate::tools::Instrument;

/// Parameters for one generation job.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub count: usize,
    pub width: u32,
    pub height: u32,
    pub color: Color,
    pub stroke_width: f64,
    pub seed: u64,
}

/// Shared flag asking a job to stop early.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A frame produced by the worker, with its finished raster.
pub struct GeneratedFrame {
    pub frame: Frame,
    pub raster: Pixmap,
}

/// Receiving end of a running generation job.
pub struct GenerationHandle {
    receiver: Receiver<GeneratedFrame>,
    cancel: CancelToken,
    worker: Option<JoinHandle<()>>,
}

impl GenerationHandle {
    /// Start a job on its own thread.
    pub fn spawn(request: GenerationRequest) -> Self {
        let (sender, receiver) = mpsc::channel();
        let cancel = CancelToken::new();
        let token = cancel.clone();

        let worker = thread::spawn(move || {
            let mut rng = SplitMix64::new(request.seed);
            for index in 0..request.count {
                if token.is_cancelled() {
                    log::info!("Frame generation cancelled after {} frames", index);
                    return;
                }
                let Some(raster) = render_random_frame(&request, &mut rng) else {
                    log::warn!("Frame generation stopped: empty canvas size");
                    return;
                };
                let generated = GeneratedFrame {
                    frame: Frame::new(),
                    raster,
                };
                if sender.send(generated).is_err() {
                    // Receiver dropped; nobody wants the rest.
                    return;
                }
            }
        });

        Self {
            receiver,
            cancel,
            worker: Some(worker),
        }
    }

    /// Next finished frame, if one is ready.
    pub fn try_next(&self) -> Option<GeneratedFrame> {
        match self.receiver.try_recv() {
            Ok(frame) => Some(frame),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Whether the worker has exited. Frames may still be queued.
    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().is_none_or(|w| w.is_finished())
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Block until the worker exits and return every remaining frame.
    pub fn wait(mut self) -> Vec<GeneratedFrame> {
        let frames: Vec<_> = self.receiver.iter().collect();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("Frame generation worker panicked");
            }
        }
        frames
    }
}

/// Render one frame holding a single random shape.
pub fn render_random_frame(request: &GenerationRequest, rng: &mut SplitMix64) -> Option<Pixmap> {
    let mut raster = blank_raster(request.width, request.height)?;
    let instrument = Instrument::SHAPES[rng.index(Instrument::SHAPES.len())];
    let w = f64::from(request.width);
    let h = f64::from(request.height);
    let p0 = Point::new(rng.range_f64(0.0, w), rng.range_f64(0.0, h));
    let p1 = Point::new(rng.range_f64(0.0, w), rng.range_f64(0.0, h));

    let layer = Layer::shape(
        0,
        instrument,
        p0,
        p1,
        Style::new(request.color, request.stroke_width),
    );
    layer.draw(&mut raster);
    Some(raster)
}
