//! Image loading: each request becomes a local async task that waits out its
//! stagger delay, decodes the image, and reports back to the engine.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::timers::future::TimeoutFuture;
use scrollreel_core::{Engine, LoadError, LoadRequest};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::HtmlImageElement;

use crate::canvas::ImageFrame;
use crate::utils::js_error_message;

pub type SharedEngine = Rc<RefCell<Engine<ImageFrame>>>;

pub fn dispatch(engine: &SharedEngine, loads: &[LoadRequest]) {
    if loads.is_empty() {
        return;
    }
    let eng = engine.borrow();
    for &load in loads {
        let url = eng.frame_url(load.index);
        spawn_local(run_load(Rc::downgrade(engine), load, url));
    }
}

async fn run_load(engine: Weak<RefCell<Engine<ImageFrame>>>, load: LoadRequest, url: String) {
    if load.delay_ms > 0 {
        TimeoutFuture::new(load.delay_ms).await;
    }
    let result = fetch_image(&url)
        .await
        .map(ImageFrame)
        .map_err(|reason| LoadError::failed(load.index, format!("{url}: {reason}")));

    // The adapter may have been dropped while the image was in flight.
    if let Some(engine) = engine.upgrade() {
        engine.borrow_mut().complete_load(load.index, result);
    }
}

async fn fetch_image(url: &str) -> Result<HtmlImageElement, String> {
    let img = HtmlImageElement::new().map_err(|e| js_error_message(&e))?;
    img.set_cross_origin(Some("anonymous"));
    img.set_attribute("decoding", "async")
        .map_err(|e| js_error_message(&e))?;
    img.set_src(url);
    JsFuture::from(img.decode())
        .await
        .map_err(|e| js_error_message(&e))?;
    Ok(img)
}
