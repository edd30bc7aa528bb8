//! Ticket project files for the ticket script toolchain.
//!
//! A project is the editor's save format: the element list plus preview
//! settings and sample values for `{name}` placeholders.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ticket_script_core::placeholder::substitute;
use ticket_script_core::{ElementKind, Script, TicketElement, generate_script};

/// Preview width in dots when a project does not set one.
pub const DEFAULT_WIDTH: u32 = 270;
/// Preview height in dots when a project does not set one.
pub const DEFAULT_HEIGHT: u32 = 800;
/// Preview-only multiplier applied to overlay heights.
pub const DEFAULT_PREVIEW_OVERLAY_SCALE: f64 = 0.775;
/// Name of a new project.
pub const DEFAULT_NAME: &str = "TicketProject";
/// Name given to a loaded project that has none.
pub const LOADED_NAME: &str = "LoadedTicket";

/// Errors that can occur when loading or validating a project.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// JSON deserialization failed.
    #[error("invalid project JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A field value is out of its valid range.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// The name of the field that failed validation.
        field: String,
        /// A human-readable explanation of why the field value is invalid.
        reason: String,
    },

    /// Valid JSON, but not a ticket project (no `elements` array).
    #[error("unrecognized project format: missing `elements` array")]
    UnrecognizedFormat,
}

/// A saved ticket layout with its preview settings.
///
/// # Example
/// ```
/// let project = ticket_script_project::TicketProject::default();
/// assert_eq!(project.width, 270);
/// assert_eq!(project.resolve_placeholders("x{num}"), "x5");
/// ```
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TicketProject {
    /// Project name; also the saved file's stem.
    pub name: String,
    /// Preview width in dots.
    pub width: u32,
    /// Preview height in dots.
    pub height: u32,
    /// Multiplier applied to overlay heights in the preview only.
    pub preview_overlay_scale: f64,
    /// The ticket layout, in print order.
    pub elements: Vec<TicketElement>,
    /// Sample values for `{name}` placeholders.
    pub variables: BTreeMap<String, String>,
}

impl Default for TicketProject {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            preview_overlay_scale: DEFAULT_PREVIEW_OVERLAY_SCALE,
            elements: Vec::new(),
            variables: sample_variables(),
        }
    }
}

/// Placeholder values a new project starts with.
pub fn sample_variables() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("typename".to_string(), "寶特瓶".to_string()),
        ("num".to_string(), "5".to_string()),
        ("date".to_string(), "112/11/10".to_string()),
    ])
}

impl TicketProject {
    /// Generate the printer script for this project's layout.
    pub fn script(&self) -> Script {
        generate_script(&self.elements)
    }

    /// Replace every `{key}` in `text` with its sample value. Unknown
    /// placeholders are kept as written.
    pub fn resolve_placeholders(&self, text: &str) -> String {
        substitute(text, &self.variables)
    }

    /// Preview height of a spacing element: feeds as-is, overlays scaled by
    /// [`preview_overlay_scale`](Self::preview_overlay_scale).
    pub fn preview_spacing(&self, element: &TicketElement) -> Option<f64> {
        element.spacing_height().map(|h| {
            if h < 0 {
                f64::from(h) * self.preview_overlay_scale
            } else {
                f64::from(h)
            }
        })
    }

    /// File name an embedded image is exported under, or `None` when the
    /// element carries no `data:image/...;base64,` payload.
    ///
    /// The stem is the last path segment of `variableName` (or `img_<id>`)
    /// without its extension; the extension comes from the payload's type.
    pub fn image_file_name(element: &TicketElement) -> Option<String> {
        let ElementKind::Image {
            content,
            variable_name,
        } = &element.kind
        else {
            return None;
        };
        let ext = image_extension(content)?;
        let fallback = format!("img_{}", element.id);
        let raw = variable_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(fallback.as_str());
        let last = raw
            .rsplit(['/', '\\'])
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(fallback.as_str());
        let stem = match last.rfind('.') {
            Some(dot) if dot + 1 < last.len() => &last[..dot],
            _ => last,
        };
        Some(format!("{stem}.{ext}"))
    }
}

/// Extension for a `data:image/<subtype>;base64,<data>` URI.
fn image_extension(uri: &str) -> Option<&'static str> {
    let rest = uri.strip_prefix("data:image/")?;
    let (subtype, data) = rest.split_once(";base64,")?;
    let subtype_ok = !subtype.is_empty()
        && subtype
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+'));
    if !subtype_ok || data.is_empty() {
        return None;
    }
    Some(match subtype.to_ascii_lowercase().as_str() {
        "jpeg" | "jpg" => "jpg",
        "png" => "png",
        "bmp" | "x-ms-bmp" => "bmp",
        "gif" => "gif",
        _ => "bin",
    })
}

/// On-disk shape, every field optional so older files still load.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProject {
    name: Option<String>,
    width: Option<f64>,
    height: Option<f64>,
    min_height: Option<f64>,
    preview_overlay_scale: Option<f64>,
    elements: Option<Vec<TicketElement>>,
    variables: Option<BTreeMap<String, String>>,
}

/// Load a [`TicketProject`] from a JSON string.
///
/// Loading is lenient: missing or zero dimensions fall back to the defaults,
/// `minHeight` is honoured when `height` is absent, an empty name becomes
/// `LoadedTicket`, and spacing elements without a height get 24. A document
/// without an `elements` array is rejected.
///
/// Range checks are separate; see [`validate_project`].
pub fn load_project_from_str(s: &str) -> Result<TicketProject, ProjectError> {
    let raw: RawProject = serde_json::from_str(s)?;
    let elements = raw.elements.ok_or(ProjectError::UnrecognizedFormat)?;

    let dim = |v: Option<f64>| v.filter(|n| n.is_finite() && *n >= 1.0).map(|n| n as u32);
    Ok(TicketProject {
        name: raw
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| LOADED_NAME.to_string()),
        width: dim(raw.width).unwrap_or(DEFAULT_WIDTH),
        height: dim(raw.height)
            .or_else(|| dim(raw.min_height))
            .unwrap_or(DEFAULT_HEIGHT),
        preview_overlay_scale: raw
            .preview_overlay_scale
            .filter(|n| n.is_finite() && *n != 0.0)
            .unwrap_or(DEFAULT_PREVIEW_OVERLAY_SCALE),
        elements,
        variables: raw.variables.unwrap_or_else(sample_variables),
    })
}

/// Serialize a project as pretty-printed JSON (two-space indentation).
pub fn save_project_to_string(project: &TicketProject) -> Result<String, ProjectError> {
    Ok(serde_json::to_string_pretty(project)?)
}

/// Check a project against the editor's input ranges:
/// - `width` in 100–400
/// - `height` in 400–2000
/// - `previewOverlayScale` in 0.1–5.0
/// - every spacing height within ±1000
///
/// Returns the first violation.
pub fn validate_project(project: &TicketProject) -> Result<(), ProjectError> {
    if !(100..=400).contains(&project.width) {
        return Err(ProjectError::InvalidField {
            field: "width".into(),
            reason: format!("{} is outside 100–400", project.width),
        });
    }
    if !(400..=2000).contains(&project.height) {
        return Err(ProjectError::InvalidField {
            field: "height".into(),
            reason: format!("{} is outside 400–2000", project.height),
        });
    }
    if !(0.1..=5.0).contains(&project.preview_overlay_scale) {
        return Err(ProjectError::InvalidField {
            field: "previewOverlayScale".into(),
            reason: format!("{} is outside 0.1–5.0", project.preview_overlay_scale),
        });
    }
    for (i, el) in project.elements.iter().enumerate() {
        if let Some(h) = el.spacing_height()
            && h.unsigned_abs() > 1000
        {
            return Err(ProjectError::InvalidField {
                field: format!("elements[{i}].spacingHeight"),
                reason: format!("{h} exceeds ±1000"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticket_script_core::Alignment;

    #[test]
    fn load_editor_project() {
        let json = r#"{
            "name": "回收券",
            "width": 300,
            "height": 900,
            "previewOverlayScale": 0.5,
            "elements": [
                { "id": "a1", "type": "text", "content": "北斗鎮公所", "align": "center",
                  "isBold": true, "size": "large" },
                { "id": "a2", "type": "spacing", "content": "", "align": "left",
                  "isBold": false, "size": "normal", "spacingHeight": -170 }
            ],
            "variables": { "num": "7" }
        }"#;
        let p = load_project_from_str(json).unwrap();
        assert_eq!(p.name, "回收券");
        assert_eq!((p.width, p.height), (300, 900));
        assert_eq!(p.elements.len(), 2);
        assert_eq!(p.elements[0].align, Alignment::Center);
        assert_eq!(p.elements[1].spacing_height(), Some(-170));
        assert_eq!(p.resolve_placeholders("{num}"), "7");
        validate_project(&p).unwrap();
    }

    #[test]
    fn load_minimal_project_uses_defaults() {
        let p = load_project_from_str(r#"{ "elements": [] }"#).unwrap();
        assert_eq!(p.name, LOADED_NAME);
        assert_eq!(p.width, DEFAULT_WIDTH);
        assert_eq!(p.height, DEFAULT_HEIGHT);
        assert_eq!(p.preview_overlay_scale, DEFAULT_PREVIEW_OVERLAY_SCALE);
        assert_eq!(p.variables, sample_variables());
    }

    #[test]
    fn legacy_min_height() {
        let p = load_project_from_str(r#"{ "minHeight": 600, "elements": [] }"#).unwrap();
        assert_eq!(p.height, 600);
        let p = load_project_from_str(r#"{ "height": 0, "minHeight": 600, "elements": [] }"#)
            .unwrap();
        assert_eq!(p.height, 600);
    }

    #[test]
    fn heightless_spacing_gets_default() {
        let p = load_project_from_str(
            r#"{ "elements": [ { "id": "s", "type": "spacing", "align": "left", "isBold": false, "size": "normal" } ] }"#,
        )
        .unwrap();
        assert_eq!(p.elements[0].spacing_height(), Some(24));
    }

    #[test]
    fn missing_elements_rejected() {
        let err = load_project_from_str(r#"{ "name": "x" }"#).unwrap_err();
        assert!(matches!(err, ProjectError::UnrecognizedFormat));
        let err = load_project_from_str("not json").unwrap_err();
        assert!(matches!(err, ProjectError::InvalidJson(_)));
    }

    #[test]
    fn save_then_load_keeps_layout() {
        let mut p = TicketProject::default();
        p.elements.push(TicketElement::text("{date}").with_align(Alignment::Right));
        p.elements.push(TicketElement::spacing(30));
        let json = save_project_to_string(&p).unwrap();
        assert!(json.contains("\n  \"name\": \"TicketProject\""), "{json}");
        assert!(json.contains("\"previewOverlayScale\": 0.775"), "{json}");
        assert_eq!(load_project_from_str(&json).unwrap(), p);
    }

    #[test]
    fn out_of_range_fields() {
        let p = TicketProject {
            width: 50,
            ..Default::default()
        };
        let err = validate_project(&p).unwrap_err();
        assert!(err.to_string().contains("width"), "{err}");

        let p = TicketProject {
            preview_overlay_scale: 9.0,
            ..Default::default()
        };
        assert!(validate_project(&p).is_err());

        let mut p = TicketProject::default();
        p.elements.push(TicketElement::text("x"));
        p.elements.push(TicketElement::spacing(-1001));
        let err = validate_project(&p).unwrap_err();
        assert!(err.to_string().contains("elements[1].spacingHeight"), "{err}");
    }

    #[test]
    fn overlay_preview_is_scaled() {
        let p = TicketProject::default();
        assert_eq!(p.preview_spacing(&TicketElement::spacing(-200)), Some(-155.0));
        assert_eq!(p.preview_spacing(&TicketElement::spacing(30)), Some(30.0));
        assert_eq!(p.preview_spacing(&TicketElement::text("x")), None);
    }

    #[test]
    fn image_export_names() {
        let mut el = TicketElement::new(ElementKind::Image {
            content: "data:image/png;base64,iVBORw0KGgo=".into(),
            variable_name: Some(r"C:\logos\logo.bin".into()),
        });
        assert_eq!(
            TicketProject::image_file_name(&el).as_deref(),
            Some("logo.png")
        );

        el.kind = ElementKind::Image {
            content: "data:image/jpeg;base64,/9j/4AAQ".into(),
            variable_name: None,
        };
        el.id = "k3j9".into();
        assert_eq!(
            TicketProject::image_file_name(&el).as_deref(),
            Some("img_k3j9.jpg")
        );

        el.kind = ElementKind::Image {
            content: "data:image/x-ms-bmp;base64,Qk0=".into(),
            variable_name: Some("stamp".into()),
        };
        assert_eq!(
            TicketProject::image_file_name(&el).as_deref(),
            Some("stamp.bmp")
        );

        el.kind = ElementKind::Image {
            content: "data:image/webp;base64,UklG".into(),
            variable_name: Some("a.b.c".into()),
        };
        assert_eq!(
            TicketProject::image_file_name(&el).as_deref(),
            Some("a.b.bin")
        );
    }

    #[test]
    fn image_without_payload_has_no_export_name() {
        let el = TicketElement::image("logo.bin");
        assert_eq!(TicketProject::image_file_name(&el), None);
        assert_eq!(TicketProject::image_file_name(&TicketElement::text("x")), None);
    }
}
