use std::rc::Rc;

use js_sys::Function;
use log::LevelFilter;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, HtmlElement};

use scrollreel_core::{Config, Engine, FrameIndex};

mod canvas;
mod host;
mod loader;
mod logger;
mod utils;

pub use canvas::{CanvasSurface, ImageFrame};

use host::Host;
use utils::jsvalue_is_undefined_or_null;

/// Scroll-scrubbed image sequence bound to one canvas.
///
/// Lifecycle: `new` → `mount` → (scrolling) → `unmount`. An unmounted
/// instance cannot be mounted again.
#[wasm_bindgen]
pub struct ScrollReel {
    host: Rc<Host>,
}

#[wasm_bindgen]
impl ScrollReel {
    /// Create a reel over `canvas`. Pass a JSON config object or undefined/null for defaults.
    /// Example:
    ///   new ScrollReel(canvas, { frame_count: 120, source: { base_path: "/seq" } })
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, config: JsValue) -> Result<ScrollReel, JsError> {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        let engine = Engine::new(cfg).map_err(|e| JsError::new(&format!("config error: {e}")))?;

        Ok(ScrollReel {
            host: Host::new(engine, canvas),
        })
    }

    /// Attach to the window and start the render loop and startup prefetch.
    pub fn mount(&self) -> Result<(), JsError> {
        self.host.mount().map_err(|e| JsError::new(&e))
    }

    /// Stop everything and release all frames. Safe to call more than once.
    pub fn unmount(&self) {
        self.host.unmount();
    }

    #[wasm_bindgen(getter)]
    pub fn mounted(&self) -> bool {
        self.host.is_mounted()
    }

    /// Register `callback(visible: boolean)`, invoked only when overlay visibility flips.
    /// Pass undefined to remove it.
    pub fn set_visibility_listener(&self, callback: Option<Function>) {
        self.host.set_visibility_listener(callback);
    }

    /// Current overlay visibility (starts true).
    pub fn overlay_visible(&self) -> bool {
        self.host.engine().borrow().overlay_visible()
    }

    /// URL of frame `index` (0-based).
    pub fn frame_url(&self, index: u32) -> Result<String, JsError> {
        let engine = self.host.engine().borrow();
        let frame_count = engine.config().frame_count;
        let index = FrameIndex::checked(i64::from(index), frame_count).ok_or_else(|| {
            JsError::new(&format!("frame_url: index {index} out of range 0..{frame_count}"))
        })?;
        Ok(engine.frame_url(index))
    }

    /// Scrollable height in pixels for the current viewport.
    pub fn scroll_extent(&self) -> f64 {
        self.host.engine().borrow().scroll_extent()
    }

    /// Give `spacer` one viewport of height per frame so the document can scroll
    /// through the whole sequence.
    pub fn size_spacer(&self, spacer: &HtmlElement) -> Result<(), JsError> {
        let frame_count = self.host.engine().borrow().config().frame_count;
        spacer
            .style()
            .set_property("height", &format!("{}vh", u64::from(frame_count) * 100))
            .map_err(|e| JsError::new(&utils::js_error_message(&e)))
    }

    /// Diagnostics snapshot (`EngineStats` as a plain object).
    pub fn stats(&self) -> Result<JsValue, JsError> {
        let stats = self.host.engine().borrow().stats();
        swb::to_value(&stats).map_err(|e| JsError::new(&format!("stats serialize error: {e}")))
    }

    /// Effective config after defaults were applied.
    pub fn config(&self) -> Result<JsValue, JsError> {
        let engine = self.host.engine().borrow();
        swb::to_value(engine.config())
            .map_err(|e| JsError::new(&format!("config serialize error: {e}")))
    }
}

impl Drop for ScrollReel {
    fn drop(&mut self) {
        self.host.unmount();
    }
}

/// ABI version for JS glue compatibility checks.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}

/// Route engine logs to the browser console. `level` is one of
/// off/error/warn/info/debug/trace.
#[wasm_bindgen]
pub fn init_logging(level: &str) -> Result<(), JsError> {
    let filter: LevelFilter = level
        .parse()
        .map_err(|_| JsError::new(&format!("unknown log level '{level}'")))?;
    logger::init(filter);
    Ok(())
}
