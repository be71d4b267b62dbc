use mdadoc_core::{ConversionOptions, ConvertError};
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

fn parse_options(options: JsValue) -> Result<ConversionOptions, ConvertError> {
    if options.is_undefined() || options.is_null() {
        return Ok(ConversionOptions::default());
    }
    serde_wasm_bindgen::from_value(options)
        .map_err(|e| ConvertError::invalid_option("options", e.to_string()))
}

fn to_js_error(err: ConvertError) -> JsError {
    JsError::new(&err.to_string())
}

/// Converts Markdown to AsciiDoc.
///
/// `options` is a plain object with camelCase option names; `undefined` or
/// `null` selects the defaults.
#[wasm_bindgen]
pub fn convert(source: &str, options: JsValue) -> Result<String, JsError> {
    let options = parse_options(options).map_err(to_js_error)?;
    mdadoc_asciidoc::convert(source, &options).map_err(to_js_error)
}

/// Converts Markdown to AsciiDoc with options given as a JSON string.
#[wasm_bindgen(js_name = convertJson)]
pub fn convert_json(source: &str, options_json: &str) -> Result<String, JsError> {
    let options = ConversionOptions::from_json(options_json).map_err(to_js_error)?;
    mdadoc_asciidoc::convert(source, &options).map_err(to_js_error)
}

/// Returns the default options as a plain object.
#[wasm_bindgen(js_name = defaultOptions)]
pub fn default_options() -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(&ConversionOptions::default())
        .map_err(|e| JsError::new(&format!("Failed to serialize options: {e}")))
}
