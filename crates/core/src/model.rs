//! Ticket element model.
//!
//! A ticket is an ordered `Vec<TicketElement>`; position in the vector is
//! print order. Elements carry no behaviour beyond construction helpers. The
//! serialized shape matches the editor's project files:
//!
//! ```json
//! { "id": "k3j9x", "type": "spacing", "align": "left", "isBold": false,
//!   "size": "normal", "spacingHeight": -170 }
//! ```

use serde::{Deserialize, Serialize};

/// Content of a freshly added text element.
pub const DEFAULT_TEXT_CONTENT: &str = "新文字項目";
/// Height of a freshly added (or height-less, when loaded) spacing element.
pub const DEFAULT_SPACING_HEIGHT: i32 = 24;
/// File name given to a freshly added image element.
pub const DEFAULT_IMAGE_NAME: &str = "logo.bin";
/// File name emitted for an image element whose `variableName` is absent or empty.
pub const FALLBACK_IMAGE_NAME: &str = "image.bin";

/// Horizontal alignment of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Flush left (printer default).
    #[default]
    Left,
    /// Centered.
    Center,
    /// Flush right.
    Right,
}

/// Character size of a text element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    /// Single width and height.
    #[default]
    Normal,
    /// Enlarged characters.
    Large,
}

/// The three element kinds, without their payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// A run of text.
    Text,
    /// A stored raster image.
    Image,
    /// A vertical feed or overlay retract.
    Spacing,
}

/// Kind-specific payload of a [`TicketElement`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    /// Text; may contain `{name}` placeholders and literal newlines.
    Text {
        /// The text to print.
        #[serde(default)]
        content: String,
    },
    /// Image loaded from a file at print time.
    Image {
        /// Embedded preview payload (usually a `data:image/...` URI), or empty.
        #[serde(default)]
        content: String,
        /// File name used when emitting the load instruction.
        #[serde(
            rename = "variableName",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        variable_name: Option<String>,
    },
    /// Paper movement: positive feeds forward, negative retracts for overlay.
    Spacing {
        /// Height in dots.
        #[serde(rename = "spacingHeight", default = "default_spacing_height")]
        spacing_height: i32,
    },
}

fn default_spacing_height() -> i32 {
    DEFAULT_SPACING_HEIGHT
}

impl ElementKind {
    /// The payload-free type tag.
    pub fn element_type(&self) -> ElementType {
        match self {
            ElementKind::Text { .. } => ElementType::Text,
            ElementKind::Image { .. } => ElementType::Image,
            ElementKind::Spacing { .. } => ElementType::Spacing,
        }
    }
}

/// One unit of a ticket layout.
///
/// `align`, `is_bold` and `size` are present on every kind even where they
/// have no visible effect, so that the printer state can be carried through
/// images and spacing unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketElement {
    /// Opaque identifier, unique within one layout. Not stable across a
    /// parse → generate → parse cycle.
    #[serde(default = "fresh_id")]
    pub id: String,
    /// Kind-specific payload, flattened into the element's JSON object.
    #[serde(flatten)]
    pub kind: ElementKind,
    /// Horizontal alignment.
    #[serde(default)]
    pub align: Alignment,
    /// Emphasized (bold) printing.
    #[serde(default)]
    pub is_bold: bool,
    /// Character size.
    #[serde(default)]
    pub size: FontSize,
}

/// Generate a fresh opaque element id.
pub fn fresh_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(12);
    id
}

impl TicketElement {
    /// Create an element with a fresh id and the printer's default styling
    /// (left, not bold, normal size).
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: fresh_id(),
            kind,
            align: Alignment::Left,
            is_bold: false,
            size: FontSize::Normal,
        }
    }

    /// A text element.
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(ElementKind::Text {
            content: content.into(),
        })
    }

    /// An image element with no embedded preview.
    pub fn image(variable_name: impl Into<String>) -> Self {
        Self::new(ElementKind::Image {
            content: String::new(),
            variable_name: Some(variable_name.into()),
        })
    }

    /// A spacing element. Negative heights are overlays.
    pub fn spacing(spacing_height: i32) -> Self {
        Self::new(ElementKind::Spacing { spacing_height })
    }

    /// An element as the editor's toolbox creates it.
    pub fn with_defaults(element_type: ElementType) -> Self {
        match element_type {
            ElementType::Text => Self::text(DEFAULT_TEXT_CONTENT),
            ElementType::Image => Self::image(DEFAULT_IMAGE_NAME),
            ElementType::Spacing => Self::spacing(DEFAULT_SPACING_HEIGHT),
        }
    }

    /// Builder: set alignment.
    pub fn with_align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    /// Builder: set bold.
    pub fn with_bold(mut self, is_bold: bool) -> Self {
        self.is_bold = is_bold;
        self
    }

    /// Builder: set character size.
    pub fn with_size(mut self, size: FontSize) -> Self {
        self.size = size;
        self
    }

    /// The payload-free type tag.
    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    /// Spacing height, for spacing elements only.
    pub fn spacing_height(&self) -> Option<i32> {
        match self.kind {
            ElementKind::Spacing { spacing_height } => Some(spacing_height),
            _ => None,
        }
    }

    /// Whether this is a negative-height spacing (overlay retract).
    pub fn is_overlay(&self) -> bool {
        self.spacing_height().is_some_and(|h| h < 0)
    }

    /// Text content, for text elements only.
    pub fn text_content(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Text { content } => Some(content),
            _ => None,
        }
    }

    /// The file name an image element loads, falling back to
    /// [`FALLBACK_IMAGE_NAME`] when unset or empty.
    pub fn image_file_name(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Image { variable_name, .. } => {
                Some(image_load_name(variable_name.as_deref()))
            }
            _ => None,
        }
    }
}

/// `variable_name`, or [`FALLBACK_IMAGE_NAME`] when absent or empty.
pub fn image_load_name(variable_name: Option<&str>) -> &str {
    variable_name
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_IMAGE_NAME)
}

/// Blank out all ids so layouts can be compared structurally (used by
/// round-trip tests and the `check` command).
pub fn strip_ids(elements: &[TicketElement]) -> Vec<TicketElement> {
    elements
        .iter()
        .map(|el| TicketElement {
            id: String::new(),
            ..el.clone()
        })
        .collect()
}
