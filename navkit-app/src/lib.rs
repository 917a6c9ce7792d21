//! # Navkit WASM Application
//!
//! Browser binding for the navkit coordinator: wires the live DOM into
//! [`navkit_core::Coordinator`] and exposes a small JavaScript handle.
//!
//! ## Usage
//!
//! Build for WASM:
//! ```bash
//! wasm-pack build --target web navkit-app
//! ```
//!
//! Then import in JavaScript:
//! ```javascript
//! import init, { NavkitApp } from './pkg/navkit_app.js';
//!
//! await init();
//! const app = new NavkitApp(JSON.stringify({ debug: true }));
//! app.start();
//!
//! // after injecting new navigation markup
//! app.reinit();
//! console.log(JSON.parse(app.debugSnapshot()));
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod error;
mod host;
mod logging;
mod probe;
mod runtime;

use navkit_core::CoordinatorConfig;
use wasm_bindgen::prelude::*;

pub use error::{AppError, AppResult};

use runtime::{Runtime, SharedRuntime};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init_wasm() {
    console_error_panic_hook::set_once();
}

/// Parse the optional JSON options passed from JavaScript.
fn parse_config(json: Option<&str>) -> AppResult<CoordinatorConfig> {
    match json.map(str::trim) {
        None | Some("") => Ok(CoordinatorConfig::default()),
        Some(json) => Ok(CoordinatorConfig::from_json(json)?),
    }
}

/// JavaScript handle to a page coordinator.
#[wasm_bindgen]
pub struct NavkitApp {
    runtime: SharedRuntime,
}

#[wasm_bindgen]
impl NavkitApp {
    /// Create a coordinator from optional JSON options.
    ///
    /// Probes the browser but does not touch the navigation until
    /// [`start`](Self::start).
    ///
    /// # Errors
    ///
    /// Returns an error if the options are invalid or there is no document.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<NavkitApp, JsValue> {
        Ok(Self::create(config_json.as_deref())?)
    }

    /// Initialize now, or on `DOMContentLoaded` if the page is still loading.
    ///
    /// # Errors
    ///
    /// Returns an error if called while the coordinator is busy.
    pub fn start(&self) -> Result<(), JsValue> {
        self.with_runtime(Runtime::start)?;
        Ok(())
    }

    /// Re-bind after the navigation markup or deferred images changed.
    ///
    /// # Errors
    ///
    /// Returns an error if called while the coordinator is busy.
    pub fn reinit(&self) -> Result<(), JsValue> {
        self.with_runtime(Runtime::reinit)?;
        Ok(())
    }

    /// Remove every listener and observer and close the menu.
    ///
    /// # Errors
    ///
    /// Returns an error if called while the coordinator is busy.
    pub fn teardown(&self) -> Result<(), JsValue> {
        self.with_runtime(Runtime::teardown)?;
        Ok(())
    }

    /// Whether the menu is expanded.
    #[wasm_bindgen(js_name = isOpen)]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.runtime
            .try_borrow()
            .is_ok_and(|runtime| runtime.coordinator().is_open())
    }

    /// Current tier: `"mobile"`, `"tablet"` or `"desktop"`.
    #[must_use]
    pub fn tier(&self) -> Option<String> {
        self.runtime
            .try_borrow()
            .ok()
            .map(|runtime| runtime.coordinator().tier().as_str().to_string())
    }

    /// JSON snapshot of the coordinator state.
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinator is busy or serialization fails.
    #[wasm_bindgen(js_name = debugSnapshot)]
    pub fn debug_snapshot(&self) -> Result<String, JsValue> {
        let runtime = self
            .runtime
            .try_borrow()
            .map_err(|_| JsValue::from_str("Coordinator is busy"))?;
        serde_json::to_string_pretty(&runtime.coordinator().snapshot())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Run the responsive self-test and return the report as JSON.
    ///
    /// Findings are also logged as warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinator is busy or serialization fails.
    #[wasm_bindgen(js_name = runDiagnostics)]
    pub fn run_diagnostics(&self) -> Result<String, JsValue> {
        let report = self.with_runtime(Runtime::run_diagnostics)?;
        serde_json::to_string(&report).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl NavkitApp {
    fn create(config_json: Option<&str>) -> AppResult<Self> {
        let config = parse_config(config_json)?;
        logging::init(config.debug);

        let window = web_sys::window().ok_or(AppError::NoWindow)?;
        let document = window.document().ok_or(AppError::NoDocument)?;

        let runtime = Runtime::new_shared(config, window, document)?;
        tracing::info!("Navkit {} ready", navkit_core::VERSION);
        Ok(Self { runtime })
    }

    fn with_runtime<R>(&self, f: impl FnOnce(&mut Runtime) -> R) -> Result<R, JsValue> {
        let mut runtime = self
            .runtime
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("Coordinator is busy"))?;
        Ok(f(&mut runtime))
    }
}
