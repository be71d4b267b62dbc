use mdadoc_core::{ConversionOptions, WrapMode};
use mdadoc_wasm::{convert, convert_json, default_options};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

#[wasm_bindgen_test]
fn convert_with_default_options() {
    let output = convert("# Hello World\n\nThis is **bold** text.", JsValue::UNDEFINED)
        .expect("convert should succeed");
    assert_eq!(output, "= Hello World\n\nThis is *bold* text.");
}

#[wasm_bindgen_test]
fn convert_with_front_matter() {
    let output = convert("---\ntitle: My Page\n---\n\nBody", JsValue::NULL)
        .expect("convert should succeed");
    assert_eq!(output, "= My Page\n\nBody");
}

#[wasm_bindgen_test]
fn convert_with_json_options() {
    let output = convert_json("### Heading 3", r#"{"headingOffset": -1}"#)
        .expect("convert should succeed");
    assert_eq!(output, "== Heading 3");
}

#[wasm_bindgen_test]
fn convert_with_object_options() {
    let options = serde_wasm_bindgen::to_value(&ConversionOptions {
        auto_ids: true,
        ..Default::default()
    })
    .expect("serialize options");
    let output = convert("## Usage", options).expect("convert should succeed");
    assert_eq!(output, "[#_usage]\n== Usage");
}

#[wasm_bindgen_test]
fn default_options_round_trip() {
    let options: ConversionOptions =
        serde_wasm_bindgen::from_value(default_options().expect("defaults"))
            .expect("deserialize defaults");
    assert_eq!(options, ConversionOptions::default());
    assert_eq!(options.wrap, WrapMode::Preserve);
}
