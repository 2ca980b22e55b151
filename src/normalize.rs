//! Surface-key normalization: untrusted provider JSON → [`ExtractedData`].
//!
//! ## Why a total function?
//!
//! The provider answers in JSON-object mode, so the reply is syntactically
//! valid JSON, but nothing guarantees the *fields* are usable: areas arrive
//! as numbers, numeric strings, comma-decimal strings, or garbage; keys are
//! missing, duplicated in meaning, or invented. Failing the whole request
//! over one bad field would throw away a mostly-good extraction. Instead,
//! every field is coerced independently: a bad value costs exactly that
//! field (plus a `warn!` log line), never the response.
//!
//! ## Ordering guarantee
//!
//! Rooms appear in a deterministic order: the nine canonical keys first, in
//! [`CANONICAL_ROOMS`] order, then every other `surface_*` key in the order
//! the provider emitted it. Running [`normalize`] twice on the same input
//! yields identical output.
//!
//! ## Strict decimal coercion
//!
//! Numeric strings must use `.` as the decimal separator. `"18,5"` is a hard
//! parse failure (field dropped, warned), never 185 or 18 — the French
//! comma-decimal habit is exactly the misparse this rule exists to catch.
//! Non-finite spellings (`"inf"`, `"NaN"`) are rejected for the same reason:
//! every area in the output must be a well-formed finite number.

use crate::schema::{ExtractedData, RawExtraction, Room, Surfaces, UNSPECIFIED};
use serde_json::Value;
use tracing::{debug, warn};

/// Canonical room keys and their display names, in output order.
///
/// These nine keys are the extraction prompt's fixed vocabulary; anything
/// else the provider reports under a `surface_*` key is an "extra" room
/// whose display name is derived from the key itself.
pub const CANONICAL_ROOMS: [(&str, &str); 9] = [
    ("surface_entree", "Entrée"),
    ("surface_sejour", "Séjour / Cuisine"),
    ("surface_suite_parentale", "Suite parentale"),
    ("surface_chambre2", "Chambre 2"),
    ("surface_chambre3", "Chambre 3"),
    ("surface_sdb", "Salle de bain"),
    ("surface_wc", "WC"),
    ("surface_dgt", "Dégagement"),
    ("surface_terrasse", "Terrasse"),
];

const SURFACE_PREFIX: &str = "surface_";
const TOTAL_AREA_KEY: &str = "surface_totale";
const PROPERTY_TYPE_KEY: &str = "type_de_bien";
const FEATURES_KEY: &str = "caracteristiques";
const VISION_ANALYSIS_KEY: &str = "vision_analysis";
const ORIENTATION_KEY: &str = "orientation_document";

/// Normalize a raw provider reply into the validated output record.
///
/// Total function: never fails. Unusable fields are dropped or defaulted
/// with a warning; see the module docs for the per-field rules.
pub fn normalize(raw: &RawExtraction) -> ExtractedData {
    let mut rooms = Vec::new();

    // ── Canonical rooms, fixed order ─────────────────────────────────────
    for (key, name) in CANONICAL_ROOMS {
        let Some(value) = raw.get(key) else { continue };
        if value.is_null() {
            continue;
        }
        if let Some(area) = coerce_area(key, value) {
            if area > 0.0 {
                rooms.push(Room {
                    name: name.to_string(),
                    area,
                });
            } else {
                debug!("surface for '{}' is not positive ({}), excluding room", key, area);
            }
        }
    }

    // ── Extra surface_* keys, encounter order ────────────────────────────
    for (key, value) in raw {
        if !key.starts_with(SURFACE_PREFIX) || key == TOTAL_AREA_KEY || is_canonical(key) {
            continue;
        }
        if value.is_null() {
            continue;
        }
        let Some(area) = coerce_area(key, value) else { continue };
        if area <= 0.0 {
            debug!("surface for '{}' is not positive ({}), excluding room", key, area);
            continue;
        }
        let name = display_name(key);
        if name.is_empty() {
            warn!("cannot derive a room name from key '{}', dropping field", key);
            continue;
        }
        rooms.push(Room { name, area });
    }

    // ── Scalar fields ────────────────────────────────────────────────────
    let total_area = coerce_total_area(raw.get(TOTAL_AREA_KEY));
    let property_type = coerce_property_type(raw.get(PROPERTY_TYPE_KEY));
    let features = coerce_features(raw.get(FEATURES_KEY));
    let vision_note = format_vision_note(raw.get(VISION_ANALYSIS_KEY));

    ExtractedData {
        property_type,
        surfaces: Surfaces { total_area, rooms },
        features,
        vision_note,
    }
}

fn is_canonical(key: &str) -> bool {
    CANONICAL_ROOMS.iter().any(|(k, _)| *k == key)
}

/// Coerce one raw value into a finite f64, or drop it with a warning.
///
/// Accepts JSON numbers and dot-decimal numeric strings (surrounding
/// whitespace tolerated). Rejects everything else, including comma-decimal
/// strings and non-finite spellings.
fn coerce_area(key: &str, value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Some(v),
            _ => {
                warn!("invalid surface value for '{}': {}, dropping field", key, value);
                None
            }
        },
        _ => {
            warn!("invalid surface value for '{}': {}, dropping field", key, value);
            None
        }
    }
}

/// `surface_totale` → total area; missing, invalid, or negative → 0.
fn coerce_total_area(value: Option<&Value>) -> f64 {
    let Some(value) = value else { return 0.0 };
    if value.is_null() {
        return 0.0;
    }
    match coerce_area(TOTAL_AREA_KEY, value) {
        Some(v) if v >= 0.0 => v,
        Some(v) => {
            warn!("total area is negative ({}), using 0", v);
            0.0
        }
        None => 0.0,
    }
}

/// `type_de_bien` → property type; anything but a non-empty string → sentinel.
fn coerce_property_type(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        None | Some(Value::Null) | Some(Value::String(_)) => UNSPECIFIED.to_string(),
        Some(other) => {
            warn!("'{}' is not a string: {}, using sentinel", PROPERTY_TYPE_KEY, other);
            UNSPECIFIED.to_string()
        }
    }
}

/// `caracteristiques` → features; accepted only as an all-string array.
fn coerce_features(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => {
            let strings: Option<Vec<String>> = items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect();
            match strings {
                Some(features) => features,
                None => {
                    warn!("'{}' contains non-string entries, using empty list", FEATURES_KEY);
                    Vec::new()
                }
            }
        }
        None | Some(Value::Null) => Vec::new(),
        Some(other) => {
            warn!("'{}' is not a list: {}, using empty list", FEATURES_KEY, other);
            Vec::new()
        }
    }
}

/// `vision_analysis` object → one-line orientation note, else `None`.
fn format_vision_note(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::Object(analysis)) => {
            let orientation = analysis
                .get(ORIENTATION_KEY)
                .and_then(Value::as_str)
                .unwrap_or(UNSPECIFIED);
            Some(format!("Orientation du document : {orientation}"))
        }
        None | Some(Value::Null) => None,
        Some(other) => {
            warn!("'{}' is not an object: {}, omitting note", VISION_ANALYSIS_KEY, other);
            None
        }
    }
}

/// Derive a display name from an unmapped `surface_*` key:
/// strip the prefix, underscores become spaces, title-case each word.
fn display_name(key: &str) -> String {
    let stripped = key.strip_prefix(SURFACE_PREFIX).unwrap_or(key);
    stripped
        .split('_')
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}
