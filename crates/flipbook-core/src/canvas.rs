//! Canvas surface and the registry that owns surfaces.
//!
//! A [`CanvasSurface`] holds the frame's base raster, the committed layers
//! keyed by id and at most one preview layer. Commands never own a surface;
//! they hold a [`SurfaceHandle`] and resolve it through the
//! [`SurfaceRegistry`] each time they run.

use std::collections::BTreeMap;
use std::fmt;

use kurbo::BezPath;
use tiny_skia::Pixmap;

use crate::layer::{Layer, LayerId};
use crate::render::{RenderTarget, blank_raster};
use crate::style::Style;

/// Base raster plus the layers drawn over it.
pub struct CanvasSurface {
    base_raster: Pixmap,
    /// Committed layers. Keyed by id so iteration is creation order.
    layers: BTreeMap<LayerId, Layer>,
    preview: Option<Layer>,
    needs_redraw: bool,
}

impl fmt::Debug for CanvasSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasSurface")
            .field("width", &self.base_raster.width())
            .field("height", &self.base_raster.height())
            .field("layers", &self.layers.keys().collect::<Vec<_>>())
            .field("preview", &self.preview.as_ref().map(|l| l.id))
            .field("needs_redraw", &self.needs_redraw)
            .finish()
    }
}

impl CanvasSurface {
    /// Create a surface over an existing raster.
    pub fn new(base_raster: Pixmap) -> Self {
        Self {
            base_raster,
            layers: BTreeMap::new(),
            preview: None,
            needs_redraw: true,
        }
    }

    /// Create a surface over a transparent raster.
    pub fn blank(width: u32, height: u32) -> Option<Self> {
        blank_raster(width, height).map(Self::new)
    }

    pub fn width(&self) -> u32 {
        self.base_raster.width()
    }

    pub fn height(&self) -> u32 {
        self.base_raster.height()
    }

    pub fn base_raster(&self) -> &Pixmap {
        &self.base_raster
    }

    /// Replace the base raster, e.g. after switching frames.
    pub fn set_base_raster(&mut self, raster: Pixmap) {
        self.base_raster = raster;
        self.needs_redraw = true;
    }

    /// Insert a committed layer, replacing any layer with the same id.
    pub fn commit(&mut self, layer: Layer) {
        self.layers.insert(layer.id, layer);
    }

    /// Remove a committed layer. Returns whether it existed.
    pub fn remove(&mut self, id: LayerId) -> bool {
        self.layers.remove(&id).is_some()
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(&id)
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.get_mut(&id)
    }

    /// Ids of committed layers in ascending order.
    pub fn layer_ids(&self) -> impl Iterator<Item = LayerId> + '_ {
        self.layers.keys().copied()
    }

    /// Committed layers in ascending id order.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.values()
    }

    /// Number of committed layers. The preview is not counted.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Replace the preview layer wholesale.
    pub fn set_preview(&mut self, layer: Layer) {
        self.preview = Some(layer);
    }

    /// Drop the preview layer. Returns whether there was one.
    pub fn clear_preview(&mut self) -> bool {
        self.preview.take().is_some()
    }

    pub fn preview(&self) -> Option<&Layer> {
        self.preview.as_ref()
    }

    /// Drop every committed layer and the preview.
    pub fn clear_layers(&mut self) {
        self.layers.clear();
        self.preview = None;
        self.needs_redraw = true;
    }

    /// Flatten a filled path straight into the base raster.
    ///
    /// Stamped pixels belong to the raster, not to any layer, so no command
    /// can take them back.
    pub fn stamp(&mut self, path: &BezPath, style: &Style) {
        RenderTarget::fill_path(&mut self.base_raster, path, style, style.blend());
        self.needs_redraw = true;
    }

    /// Draw the base raster, committed layers by ascending id, then the
    /// preview.
    pub fn composite<T: RenderTarget + ?Sized>(&self, target: &mut T) {
        target.draw_raster(&self.base_raster);
        for layer in self.layers.values() {
            layer.draw(target);
        }
        if let Some(preview) = &self.preview {
            preview.draw(target);
        }
    }

    /// Base raster with the committed layers flattened onto it.
    ///
    /// The preview is left out; this is what gets saved for a frame.
    pub fn snapshot(&self) -> Pixmap {
        let mut raster = self.base_raster.clone();
        for layer in self.layers.values() {
            layer.draw(&mut raster);
        }
        raster
    }

    pub fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Return and reset the redraw request.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }
}

/// Non-owning reference to a surface in a [`SurfaceRegistry`].
///
/// A handle stops resolving once its surface is released, even when the
/// slot is later reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle {
    index: u32,
    generation: u32,
}

#[derive(Debug)]
struct SurfaceSlot {
    generation: u32,
    surface: Option<CanvasSurface>,
}

/// Arena owning every live canvas surface.
#[derive(Debug, Default)]
pub struct SurfaceRegistry {
    slots: Vec<SurfaceSlot>,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a surface and hand back its handle.
    pub fn insert(&mut self, surface: CanvasSurface) -> SurfaceHandle {
        if let Some((index, slot)) = self
            .slots
            .iter_mut()
            .enumerate()
            .find(|(_, slot)| slot.surface.is_none())
        {
            slot.surface = Some(surface);
            return SurfaceHandle {
                index: index as u32,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(SurfaceSlot {
            generation: 0,
            surface: Some(surface),
        });
        SurfaceHandle {
            index,
            generation: 0,
        }
    }

    fn slot(&self, handle: SurfaceHandle) -> Option<&SurfaceSlot> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
    }

    pub fn get(&self, handle: SurfaceHandle) -> Option<&CanvasSurface> {
        self.slot(handle)?.surface.as_ref()
    }

    pub fn get_mut(&mut self, handle: SurfaceHandle) -> Option<&mut CanvasSurface> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)?
            .surface
            .as_mut()
    }

    pub fn contains(&self, handle: SurfaceHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Tear a surface down. Every outstanding handle to it goes stale.
    pub fn release(&mut self, handle: SurfaceHandle) -> Option<CanvasSurface> {
        let slot = self
            .slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)?;
        let surface = slot.surface.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        Some(surface)
    }

    /// Number of live surfaces.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.surface.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
