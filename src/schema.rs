//! Output data model: the validated record returned by `POST /extract`.
//!
//! [`ExtractedData`] is the only shape clients ever see. Its invariants are
//! established by [`crate::normalize::normalize`] and hold from construction
//! onward: every area is a finite number, `property_type` is never empty
//! (sentinel [`UNSPECIFIED`] when the provider omitted it), `features` is
//! never missing. `vision_note` is the one optional field — only the vision
//! strategy populates it, and it serialises as JSON `null` otherwise so the
//! response schema stays stable across strategies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sentinel used when the provider omitted a required string field.
pub const UNSPECIFIED: &str = "Unspecified";

/// The untrusted JSON object returned by the LLM provider.
///
/// Key order is preserved (`serde_json` is built with `preserve_order`):
/// the order in which unmapped `surface_*` keys appear here is the order
/// their rooms appear in the output.
pub type RawExtraction = serde_json::Map<String, Value>;

/// A single room with its floor area in m².
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Human-readable display name, e.g. `"Séjour / Cuisine"`.
    pub name: String,
    /// Area in m², strictly positive.
    pub area: f64,
}

/// Total area plus the ordered list of rooms.
///
/// Room order is the only externally observable sequencing guarantee:
/// canonical rooms first (fixed order), then unmapped rooms in the order
/// the provider emitted them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Surfaces {
    /// Total area in m², `>= 0` (0 when the provider gave none).
    pub total_area: f64,
    pub rooms: Vec<Room>,
}

/// The validated extraction result for one floor-plan PDF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedData {
    /// Property description, e.g. `"Appartement T3 - RDC"` or `"Maison"`.
    pub property_type: String,
    pub surfaces: Surfaces,
    /// Special features read off the plan legend, e.g. `"Placard dans Entrée"`.
    pub features: Vec<String>,
    /// One-line document-orientation note; vision strategy only.
    pub vision_note: Option<String>,
}

impl Default for ExtractedData {
    fn default() -> Self {
        Self {
            property_type: UNSPECIFIED.to_string(),
            surfaces: Surfaces::default(),
            features: Vec::new(),
            vision_note: None,
        }
    }
}
