//! Browser host: wires window signals, the display-synced loop and image
//! loading to one [`Engine`].

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use gloo::render::{request_animation_frame, AnimationFrame};
use gloo::timers::callback::Timeout;
use js_sys::{Function, Reflect};
use scrollreel_core::Engine;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlCanvasElement, Window};

use crate::canvas::CanvasSurface;
use crate::loader::{self, SharedEngine};
use crate::utils::js_error_message;

/// Pending startup full-range prefetch. Dropping it cancels the request.
enum IdleStart {
    Callback {
        window: Window,
        handle: u32,
        _closure: Closure<dyn FnMut()>,
    },
    Timer(Timeout),
}

impl Drop for IdleStart {
    fn drop(&mut self) {
        if let IdleStart::Callback { window, handle, .. } = self {
            window.cancel_idle_callback(*handle);
        }
    }
}

pub struct Host {
    engine: SharedEngine,
    canvas: HtmlCanvasElement,
    surface: RefCell<Option<CanvasSurface>>,
    frame: RefCell<Option<AnimationFrame>>,
    listeners: RefCell<Vec<EventListener>>,
    idle: RefCell<Option<IdleStart>>,
    on_visibility: RefCell<Option<Function>>,
    mounted: Cell<bool>,
}

impl Host {
    pub fn new(engine: Engine<crate::canvas::ImageFrame>, canvas: HtmlCanvasElement) -> Rc<Self> {
        Rc::new(Self {
            engine: Rc::new(RefCell::new(engine)),
            canvas,
            surface: RefCell::new(None),
            frame: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
            idle: RefCell::new(None),
            on_visibility: RefCell::new(None),
            mounted: Cell::new(false),
        })
    }

    pub fn engine(&self) -> &SharedEngine {
        &self.engine
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    pub fn set_visibility_listener(&self, callback: Option<Function>) {
        *self.on_visibility.borrow_mut() = callback;
    }

    pub fn mount(self: &Rc<Self>) -> Result<(), String> {
        if self.mounted.get() {
            return Ok(());
        }
        if self.engine.borrow().is_torn_down() {
            return Err("already unmounted; create a new ScrollReel".into());
        }
        let window = web_sys::window().ok_or("no global window")?;
        self.mounted.set(true);

        self.sync_viewport(&window);

        match CanvasSurface::acquire(&self.canvas) {
            Ok(mut surface) => {
                surface.resize(window.device_pixel_ratio());
                *self.surface.borrow_mut() = Some(surface);
            }
            // The page keeps working without the sequence.
            Err(err) => log::warn!("canvas: {err}; frames will not be drawn"),
        }

        self.install_listeners(&window);
        self.schedule_idle_prefetch(&window);
        if self.surface.borrow().is_some() {
            self.schedule_frame();
        }
        log::info!("host: mounted");
        Ok(())
    }

    /// Stop the loop, detach listeners and tear the engine down. Loads already
    /// in flight finish against the torn-down engine and are ignored.
    pub fn unmount(&self) {
        if !self.mounted.replace(false) {
            return;
        }
        self.frame.borrow_mut().take();
        self.listeners.borrow_mut().clear();
        self.idle.borrow_mut().take();
        self.surface.borrow_mut().take();
        self.engine.borrow_mut().teardown();
    }

    fn sync_viewport(&self, window: &Window) {
        let height = window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(1.0);
        let scroll_y = window.scroll_y().unwrap_or(0.0);
        let mut engine = self.engine.borrow_mut();
        engine.on_resize(height);
        engine.on_scroll(scroll_y);
    }

    fn install_listeners(self: &Rc<Self>, window: &Window) {
        let mut listeners = Vec::new();

        let host = Rc::downgrade(self);
        let win = window.clone();
        // Default options register a passive listener.
        listeners.push(EventListener::new(window, "scroll", move |_| {
            if let Some(host) = host.upgrade() {
                host.engine
                    .borrow_mut()
                    .on_scroll(win.scroll_y().unwrap_or(0.0));
            }
        }));

        let host = Rc::downgrade(self);
        let win = window.clone();
        listeners.push(EventListener::new(window, "resize", move |_| {
            if let Some(host) = host.upgrade() {
                host.on_resize(&win);
            }
        }));

        *self.listeners.borrow_mut() = listeners;
    }

    fn on_resize(&self, window: &Window) {
        self.sync_viewport(window);
        if let Some(surface) = self.surface.borrow_mut().as_mut() {
            surface.resize(window.device_pixel_ratio());
            self.engine.borrow_mut().invalidate();
        }
    }

    fn schedule_idle_prefetch(&self, window: &Window) {
        let engine = Rc::downgrade(&self.engine);
        let has_idle = Reflect::has(window, &JsValue::from_str("requestIdleCallback"))
            .unwrap_or(false);

        if has_idle {
            let closure: Closure<dyn FnMut()> = Closure::once(full_prefetch(engine.clone()));
            match window.request_idle_callback(closure.as_ref().unchecked_ref()) {
                Ok(handle) => {
                    *self.idle.borrow_mut() = Some(IdleStart::Callback {
                        window: window.clone(),
                        handle,
                        _closure: closure,
                    });
                    return;
                }
                Err(e) => log::debug!(
                    "host: requestIdleCallback failed ({}); using timer",
                    js_error_message(&e)
                ),
            }
        }

        let delay = self.engine.borrow().config().idle_fallback_ms;
        *self.idle.borrow_mut() = Some(IdleStart::Timer(Timeout::new(
            delay,
            full_prefetch(engine),
        )));
    }

    fn schedule_frame(self: &Rc<Self>) {
        let host = Rc::clone(self);
        let handle = request_animation_frame(move |_timestamp| {
            host.frame.borrow_mut().take();
            host.on_frame();
        });
        *self.frame.borrow_mut() = Some(handle);
    }

    fn on_frame(self: &Rc<Self>) {
        if !self.mounted.get() {
            return;
        }
        let out = {
            let mut surface = self.surface.borrow_mut();
            let Some(surface) = surface.as_mut() else {
                return;
            };
            self.engine.borrow_mut().tick(surface)
        };

        loader::dispatch(&self.engine, &out.loads);
        if let Some(visible) = out.visibility {
            self.publish_visibility(visible);
        }
        // The visibility callback may have unmounted us.
        if self.mounted.get() {
            self.schedule_frame();
        }
    }

    fn publish_visibility(&self, visible: bool) {
        let callback = self.on_visibility.borrow().clone();
        if let Some(callback) = callback {
            if let Err(e) = callback.call1(&JsValue::UNDEFINED, &JsValue::from_bool(visible)) {
                log::warn!("host: visibility listener threw: {}", js_error_message(&e));
            }
        }
    }
}

fn full_prefetch(engine: Weak<RefCell<Engine<crate::canvas::ImageFrame>>>) -> impl FnOnce() {
    move || {
        if let Some(engine) = engine.upgrade() {
            let loads = engine.borrow_mut().request_all();
            loader::dispatch(&engine, &loads);
        }
    }
}
