//! WASM bindings for the ticket script toolchain.
//!
//! Exposes generate, parse, and explain to the layout editor via
//! `wasm-bindgen`. Structured results are returned as native JS objects
//! using `serde-wasm-bindgen`; layouts come in as JSON strings, matching
//! what the editor stores.

use wasm_bindgen::prelude::*;

use ticket_script_core::{ElementType, TicketElement, generate_script, parse_script};
use ticket_script_project::{load_project_from_str, validate_project};

// ── Public API ──────────────────────────────────────────────────────────

/// Generate the script for a JSON array of elements.
///
/// Returns `[{ text, elementId? }]`, one entry per line; the editor uses
/// the ids to highlight the lines belonging to the selected element.
#[wasm_bindgen]
pub fn generate(elements_json: &str) -> Result<JsValue, JsError> {
    to_js(&generate_script(&read_elements(elements_json)?).lines)
}

/// Generate the script for a JSON array of elements as one string.
#[wasm_bindgen(js_name = "generateText")]
pub fn generate_text(elements_json: &str) -> Result<String, JsError> {
    Ok(generate_script(&read_elements(elements_json)?).text())
}

/// A new element of `elementType` (`"text"`, `"image"` or `"spacing"`)
/// as the editor's toolbox adds it: default content, left-aligned, plain.
#[wasm_bindgen(js_name = "newElement")]
pub fn new_element(element_type: &str) -> Result<JsValue, JsError> {
    let element_type: ElementType =
        serde_json::from_value(serde_json::Value::String(element_type.to_string()))
            .map_err(|e| JsError::new(&e.to_string()))?;
    to_js(&TicketElement::with_defaults(element_type))
}

/// Parse a script and return `{ elements, diagnostics }`.
///
/// Never throws; an unrecognisable script yields an empty `elements` array
/// and a `TKS1004` note.
#[wasm_bindgen]
pub fn parse(script: &str) -> Result<JsValue, JsError> {
    to_js(&parse_script(script))
}

/// Load a saved project file, apply defaults, and return it as an object.
///
/// Throws if the document is not a project; range problems are reported
/// by [`validate`] instead.
#[wasm_bindgen(js_name = "loadProject")]
pub fn load_project(project_json: &str) -> Result<JsValue, JsError> {
    let project = load_project_from_str(project_json).map_err(|e| JsError::new(&e.to_string()))?;
    to_js(&project)
}

/// Check a project's dimensions and spacing heights.
///
/// Returns `null` when valid, otherwise the error message.
#[wasm_bindgen]
pub fn validate(project_json: &str) -> Result<Option<String>, JsError> {
    let project = load_project_from_str(project_json).map_err(|e| JsError::new(&e.to_string()))?;
    Ok(validate_project(&project).err().map(|e| e.to_string()))
}

/// Explain a diagnostic code (e.g., "TKS1001").
///
/// Returns the explanation string, or `null` if unknown.
#[wasm_bindgen]
pub fn explain(id: &str) -> Option<String> {
    ticket_script_core::explain(id).map(|s| s.to_string())
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn read_elements(json: &str) -> Result<Vec<TicketElement>, JsError> {
    serde_json::from_str(json).map_err(|e| JsError::new(&e.to_string()))
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsError::new(&e.to_string()))
}
