//! Browser entry points
//!
//! The web page hands the session its host object (on Android, the
//! `window.android` JavaScript interface) and forwards UI commands and tile
//! requests to a [`WebMapSession`].

use crate::{
    bridge::HostBridge, core::bounds::Bounds, session::MapSession, tiles::grid_zoom, MapError,
    Result,
};
use js_sys::{Function, Reflect};
use wasm_bindgen::{prelude::wasm_bindgen, JsCast, JsValue};

fn js_err(e: impl ToString) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Calls the host's JavaScript interface by method name
pub struct JsHostBridge {
    host: JsValue,
}

impl JsHostBridge {
    pub fn new(host: JsValue) -> Self {
        Self { host }
    }

    fn call(&self, method: &str) -> Result<String> {
        let member = Reflect::get(&self.host, &JsValue::from_str(method))
            .map_err(|e| MapError::Bridge(format!("host lookup of '{}' failed: {:?}", method, e)))?;
        let function: Function = member
            .dyn_into()
            .map_err(|_| MapError::Bridge(format!("host has no method '{}'", method)))?;
        function
            .call0(&self.host)
            .map_err(|e| MapError::Bridge(format!("host call '{}' threw: {:?}", method, e)))?
            .as_string()
            .ok_or_else(|| MapError::Bridge(format!("host call '{}' did not return a string", method)))
    }
}

impl HostBridge for JsHostBridge {
    fn current_map(&self) -> Result<String> {
        self.call("getCurrentMap")
    }

    fn kmls(&self) -> Result<String> {
        self.call("getKMLs")
    }

    fn samples(&self) -> Result<String> {
        self.call("getSamples")
    }

    fn current_location(&self) -> Result<String> {
        self.call("getCurrentLocation")
    }

    fn position_history(&self) -> Result<String> {
        self.call("getPositionHistory")
    }

    fn orientation(&self) -> Result<String> {
        self.call("getOrientation")
    }
}

/// Forwards `log` records to the browser console
struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let line = JsValue::from_str(&format!(
            "[{}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        ));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&line),
            log::Level::Warn => web_sys::console::warn_1(&line),
            _ => web_sys::console::log_1(&line),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Routes logging to the console and installs the panic hook
#[wasm_bindgen]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Debug);
    }
}

/// A map session driven from JavaScript
#[wasm_bindgen]
pub struct WebMapSession {
    inner: MapSession,
}

#[wasm_bindgen]
impl WebMapSession {
    /// Starts a session against `host`, which must expose `getCurrentMap`,
    /// `getKMLs`, `getSamples`, `getCurrentLocation`, `getPositionHistory`
    /// and `getOrientation`.
    #[wasm_bindgen(constructor)]
    pub fn new(host: JsValue) -> std::result::Result<WebMapSession, JsValue> {
        init();
        let inner = MapSession::init(Box::new(JsHostBridge::new(host))).map_err(js_err)?;
        Ok(WebMapSession { inner })
    }

    #[wasm_bindgen(js_name = "setLayers")]
    pub fn set_layers(&mut self, msg: &str) {
        self.inner.dispatch(msg);
    }

    /// URL of the tile covering the given bounds (map projection). Zooms
    /// past the deepest grid level are treated as that level.
    #[wasm_bindgen(js_name = "getTileUrl")]
    pub fn get_tile_url(&self, left: f64, bottom: f64, right: f64, top: f64, zoom: u32) -> String {
        let bounds = Bounds::from_coords(left, bottom, right, top);
        self.inner.tile_url(&bounds, grid_zoom(zoom)).as_str().to_string()
    }

    #[wasm_bindgen(js_name = "selectFeature")]
    pub fn select_feature(
        &mut self,
        layer_id: &str,
        feature_id: &str,
    ) -> std::result::Result<(), JsValue> {
        self.inner.select_feature(layer_id, feature_id).map_err(js_err)
    }

    #[wasm_bindgen(js_name = "unselectFeature")]
    pub fn unselect_feature(&mut self, feature_id: &str) -> bool {
        self.inner.unselect_feature(feature_id)
    }

    #[wasm_bindgen(js_name = "closePopup")]
    pub fn close_popup(&mut self) {
        self.inner.close_popup();
    }

    /// HTML of the open popup, if any
    #[wasm_bindgen(js_name = "popupHtml")]
    pub fn popup_html(&self) -> Option<String> {
        self.inner.popup().map(|p| p.content.clone())
    }

    #[wasm_bindgen(js_name = "zoomTo")]
    pub fn zoom_to(&mut self, zoom: u32) {
        self.inner.zoom_to(grid_zoom(zoom));
    }

    pub fn zoom(&self) -> u8 {
        self.inner.view().zoom
    }
}
