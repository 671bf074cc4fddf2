//! Color Studio: a content script that injects a filter control panel next
//! to a page's video and keeps the composed CSS filter applied across
//! single-page navigations.
//!
//! The DOM-free core (`filter`, `layout`, `controller`) builds and tests on
//! any target; the `web-sys` glue only compiles for `wasm32`.

pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod layout;
pub mod logging;

pub use config::StudioConfig;
pub use controller::{InjectOutcome, Observation, PageHost, PanelController};
pub use error::StudioError;
pub use filter::{FilterParam, FilterState, FilterStateManager, FilterTarget, Preset};

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;
    use std::rc::Rc;

    use tracing::{debug, info};
    use wasm_bindgen::prelude::*;

    use crate::config::StudioConfig;
    use crate::logging::init_logging;

    mod dom;
    mod studio;

    pub use dom::{materialize, DomHost};
    pub use studio::Studio;

    thread_local! {
        static ACTIVE: RefCell<Option<Rc<Studio>>> = const { RefCell::new(None) };
    }

    fn install_panic_hook() {
        use std::sync::Once;

        static ONCE: Once = Once::new();
        ONCE.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = match info.location() {
                    Some(loc) => format!(
                        "[color-studio] panic at {}:{}:{}: {info}",
                        loc.file(),
                        loc.line(),
                        loc.column()
                    ),
                    None => format!("[color-studio] panic: {info}"),
                };
                web_sys::console::error_1(&JsValue::from_str(&msg));
            }));
        });
    }

    #[wasm_bindgen(start)]
    pub fn main() {
        install_panic_hook();
    }

    fn launch(config: StudioConfig) -> Result<(), JsValue> {
        if ACTIVE.with(|active| active.borrow().is_some()) {
            debug!("already running");
            return Ok(());
        }
        // The first launch in the page context picks the level.
        init_logging(config.log_level);
        let studio = Studio::start(config)?;
        ACTIVE.with(|active| *active.borrow_mut() = Some(studio));
        info!("watching for videos");
        Ok(())
    }

    /// Start with the default configuration.
    #[wasm_bindgen]
    pub fn start() -> Result<(), JsValue> {
        launch(StudioConfig::default())
    }

    /// Start with a JSON configuration; missing keys take their defaults.
    #[wasm_bindgen(js_name = startWithConfig)]
    pub fn start_with_config(json: &str) -> Result<(), JsValue> {
        let config =
            StudioConfig::from_json(json).map_err(|err| JsValue::from_str(&err.to_string()))?;
        launch(config)
    }

    /// Current filter values as JSON, or `null` before `start`.
    #[wasm_bindgen(js_name = currentStateJson)]
    pub fn current_state_json() -> Option<String> {
        ACTIVE.with(|active| {
            let state = active.borrow().as_ref()?.state();
            serde_json::to_string(&state).ok()
        })
    }

    /// Disconnect the document observer.
    #[wasm_bindgen]
    pub fn stop() {
        if let Some(studio) = ACTIVE.with(|active| active.borrow_mut().take()) {
            studio.stop();
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::{current_state_json, materialize, start, start_with_config, stop, DomHost, Studio};
