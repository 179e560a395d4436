//! Browser binding
//!
//! Exposes the puzzle call surface to JavaScript. The page owns rendering,
//! picking and the number palette; it calls in with a top-row coordinate and
//! the selected number, then redraws from `snapshot()`.

use wasm_bindgen::prelude::*;

use crate::config::PuzzleConfig;
use crate::error::PyramidError;
use crate::puzzle::Puzzle;

fn to_js(err: PyramidError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier module instance
        return;
    }
    log::info!("diff-pyramid ready");
}

#[wasm_bindgen]
pub struct WebPuzzle {
    inner: Puzzle,
}

#[wasm_bindgen]
impl WebPuzzle {
    /// Build from a JSON config; an empty string uses the defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WebPuzzle, JsValue> {
        let config = if config_json.trim().is_empty() {
            PuzzleConfig::default()
        } else {
            PuzzleConfig::from_json(config_json).map_err(to_js)?
        };
        let inner = Puzzle::new(config).map_err(to_js)?;
        Ok(WebPuzzle { inner })
    }

    #[wasm_bindgen(js_name = setTopValue)]
    pub fn set_top_value(&mut self, index: usize, value: f64) -> Result<(), JsValue> {
        self.inner.set_top_number(index, value).map_err(to_js)
    }

    #[wasm_bindgen(js_name = setTopAt)]
    pub fn set_top_at(&mut self, row: usize, col: usize, value: f64) -> Result<(), JsValue> {
        self.inner.set_top_at_number(row, col, value).map_err(to_js)
    }

    #[wasm_bindgen(js_name = shuffleTop)]
    pub fn shuffle_top(&mut self) {
        self.inner.shuffle_top();
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Cell value, or `undefined` when unset
    #[wasm_bindgen(js_name = getValue)]
    pub fn get_value(&self, layer: usize, index: usize) -> Result<Option<u32>, JsValue> {
        self.inner.value(layer, index).map(|c| c.value()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = getDuplicates)]
    pub fn get_duplicates(&self) -> Vec<u32> {
        self.inner.duplicates().iter().copied().collect()
    }

    /// Invalid cells as a JSON array of `{layer, row, col}`
    #[wasm_bindgen(js_name = getInvalid)]
    pub fn get_invalid(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.inner.invalid()).map_err(|e| to_js(e.into()))
    }

    /// `[count, total]`
    #[wasm_bindgen(js_name = getUniqueScore)]
    pub fn get_unique_score(&self) -> Vec<u32> {
        let score = self.inner.unique_score();
        vec![score.count as u32, score.total as u32]
    }

    #[wasm_bindgen(js_name = isSolved)]
    pub fn is_solved(&self) -> bool {
        self.inner.is_solved()
    }

    /// Full render state as JSON
    pub fn snapshot(&self) -> Result<String, JsValue> {
        self.inner.snapshot().to_json().map_err(to_js)
    }
}
