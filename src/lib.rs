pub mod chunker;
pub mod converter;
pub mod coordinate;
pub mod encoder;
pub mod error;
pub mod options;
pub mod parser;
pub mod spreadsheet;
pub mod waypoint_types;

use chrono::Utc;
use js_sys::{Array, Object, Reflect, Uint8Array};
use wasm_bindgen::prelude::*;

use crate::converter::OutputFile;
use crate::options::ConvertOptions;

/// Convert an uploaded spreadsheet or KML file. Returns an array of
/// `{ fileName, mimeType, data }` objects, one per output document.
#[wasm_bindgen(js_name = convertWaypoints)]
pub fn convert_waypoints(file_name: &str, data: &[u8], options: JsValue) -> Result<Array, JsValue> {
    console_error_panic_hook::set_once();

    let opts = parse_options(options)?;
    let files = converter::convert(file_name, data, &opts, Utc::now())?;
    files.into_iter().map(output_file_to_js).collect()
}

/// Decode an uploaded file and return its waypoint table as a JS object.
#[wasm_bindgen(js_name = previewWaypoints)]
pub fn preview_waypoints(file_name: &str, data: &[u8]) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let table = converter::load_table(file_name, data)?;
    serde_wasm_bindgen::to_value(&table).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Decode an uploaded file and return its waypoint table as a JSON string.
#[wasm_bindgen(js_name = previewWaypointsString)]
pub fn preview_waypoints_string(file_name: &str, data: &[u8]) -> Result<String, JsValue> {
    console_error_panic_hook::set_once();

    let table = converter::load_table(file_name, data)?;
    serde_json::to_string(&table).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_options(options: JsValue) -> Result<ConvertOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(ConvertOptions::default())
    } else {
        serde_wasm_bindgen::from_value(options).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

fn output_file_to_js(file: OutputFile) -> Result<Object, JsValue> {
    let obj = Object::new();
    Reflect::set(&obj, &"fileName".into(), &file.file_name.into())?;
    Reflect::set(&obj, &"mimeType".into(), &file.mime_type.into())?;
    Reflect::set(&obj, &"data".into(), &Uint8Array::from(file.data.as_slice()))?;
    Ok(obj)
}
