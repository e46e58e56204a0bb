//! Closed hazard vocabulary and alias resolution
//!
//! The canonical tag set and the alias table are immutable, process-wide,
//! read-only lookup structures built once on first use. No dynamic
//! registration exists; downstream actuation only understands these tags.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Canonical hazard category tags (v3.0 taxonomy), in taxonomy order.
pub static CANONICAL_TAGS: &[&str] = &[
    "trafficcone",
    "person",
    "vehicle",
    "bicycle",
    "motorcycle",
    "stroller",
    "barrier",
    "fence",
    "gatearm",
    "construction",
    "debris",
    "pole",
    "signpost",
    "bollard",
    "step",
    "curb",
    "openhole",
    "puddle",
    "crack",
    "uneven",
    "ramp",
    "trolley",
    "door",
    "furniture",
    "planter",
    "vegetation",
    "dog",
    "leash",
    "cart",
    "ladder",
    "pallet",
    "scaffold",
    "wire",
    "rope",
    "rail",
    "bench",
    "trashcan",
    "mailbox",
    "hydrant",
    "scooter",
    "wheelchair",
    "crate",
    "box",
    "bag",
    "suitcase",
];

/// Informal or synonym spellings seen in generator output, mapped to their
/// canonical tag.
static TAG_ALIASES: &[(&str, &str)] = &[
    ("cone", "trafficcone"),
    ("car", "vehicle"),
    ("truck", "vehicle"),
    ("van", "vehicle"),
    ("bike", "bicycle"),
    ("sign", "signpost"),
    ("bollards", "bollard"),
];

/// Category assigned when a detected hazard arrives uncategorized.
pub const FALLBACK_TAG: &str = "debris";

/// The closed vocabulary as a lookup set.
pub fn vocabulary() -> &'static HashSet<&'static str> {
    static VOCABULARY: OnceLock<HashSet<&'static str>> = OnceLock::new();
    VOCABULARY.get_or_init(|| CANONICAL_TAGS.iter().copied().collect())
}

/// The alias table as a lookup map.
pub fn aliases() -> &'static HashMap<&'static str, &'static str> {
    static ALIASES: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    ALIASES.get_or_init(|| TAG_ALIASES.iter().copied().collect())
}

/// Check whether a tag belongs to the closed vocabulary.
pub fn is_canonical(tag: &str) -> bool {
    vocabulary().contains(tag)
}

/// Resolve an already-folded label through the alias table.
///
/// Unknown labels pass through unchanged; vocabulary membership is decided
/// separately by the canonicalizer.
pub fn resolve_alias(label: &str) -> &str {
    aliases().get(label).copied().unwrap_or(label)
}

/// Lowercase and trim a free-text label.
pub fn fold_label(label: &str) -> String {
    label.trim().to_lowercase()
}
