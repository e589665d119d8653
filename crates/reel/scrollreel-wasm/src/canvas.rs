//! Canvas 2D drawing surface and image frame handle.

use js_sys::{Object, Reflect};
use scrollreel_core::{BackingStore, Frame, LogicalSize, Surface, SurfaceError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::utils::js_error_message;

/// A loaded `<img>` element.
#[derive(Clone, Debug)]
pub struct ImageFrame(pub HtmlImageElement);

impl Frame for ImageFrame {
    fn is_complete(&self) -> bool {
        self.0.complete()
    }
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    backing: BackingStore,
}

impl CanvasSurface {
    /// Acquire an opaque, low-latency 2D context for `canvas`.
    pub fn acquire(canvas: &HtmlCanvasElement) -> Result<Self, SurfaceError> {
        let options = Object::new();
        for (key, value) in [
            ("alpha", false),
            ("desynchronized", true),
            ("willReadFrequently", false),
        ] {
            Reflect::set(&options, &JsValue::from_str(key), &JsValue::from_bool(value))
                .map_err(|e| SurfaceError::Draw(js_error_message(&e)))?;
        }
        let ctx = canvas
            .get_context_with_context_options("2d", &options)
            .ok()
            .flatten()
            .and_then(|obj| obj.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or(SurfaceError::Unavailable)?;

        Ok(Self {
            canvas: canvas.clone(),
            ctx,
            backing: BackingStore::for_display(0.0, 0.0, 1.0),
        })
    }

    /// Match the backing store to the canvas' displayed size at `device_pixel_ratio`.
    ///
    /// Resizing the backing store resets all context state, so the scale and
    /// smoothing settings are applied again afterwards.
    pub fn resize(&mut self, device_pixel_ratio: f64) {
        let rect = self.canvas.get_bounding_client_rect();
        self.backing = BackingStore::for_display(rect.width(), rect.height(), device_pixel_ratio);
        self.canvas.set_width(self.backing.width);
        self.canvas.set_height(self.backing.height);

        let scale = self.backing.scale;
        if let Err(e) = self.ctx.set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0) {
            log::warn!("canvas: set_transform failed: {}", js_error_message(&e));
        }
        self.ctx.set_image_smoothing_enabled(true);
        // Not every engine exposes imageSmoothingQuality.
        let _ = Reflect::set(
            &self.ctx,
            &JsValue::from_str("imageSmoothingQuality"),
            &JsValue::from_str("high"),
        );
        log::debug!(
            "canvas: backing store {}x{} at {}x",
            self.backing.width,
            self.backing.height,
            scale
        );
    }
}

impl Surface<ImageFrame> for CanvasSurface {
    fn logical_size(&self) -> LogicalSize {
        self.backing.logical_size()
    }

    fn clear(&mut self) -> Result<(), SurfaceError> {
        let size = self.backing.logical_size();
        self.ctx.clear_rect(0.0, 0.0, size.width, size.height);
        Ok(())
    }

    fn draw_frame(&mut self, frame: &ImageFrame, size: LogicalSize) -> Result<(), SurfaceError> {
        self.ctx
            .draw_image_with_html_image_element_and_dw_and_dh(
                &frame.0,
                0.0,
                0.0,
                size.width,
                size.height,
            )
            .map_err(|e| SurfaceError::Draw(js_error_message(&e)))
    }
}
