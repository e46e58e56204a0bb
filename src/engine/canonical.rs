//! Canonicalizer - closed-vocabulary normalization of free-text labels
//!
//! Category labels are lowercased, trimmed, resolved through the alias
//! table, filtered to the closed vocabulary, and deduplicated by first
//! occurrence. The generator's ranked saliency order survives
//! normalization. Out-of-vocabulary labels are dropped silently: the
//! generator is allowed to hallucinate extra categories, and only
//! recognized ones matter to downstream actuation.

use std::collections::HashSet;

use crate::contracts::{GuidanceReport, HazardReport};
use crate::taxonomy::{fold_label, is_canonical, resolve_alias};

/// Normalize a raw category list into canonical tags.
pub fn canonical_tags(raw: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut tags = Vec::new();
    for label in raw {
        let tag = resolve_alias(&fold_label(label)).to_string();
        if !is_canonical(&tag) {
            continue;
        }
        if seen.insert(tag.clone()) {
            tags.push(tag);
        }
    }
    tags
}

/// Canonicalize a hazard record in place.
///
/// `bearing` and `proximity` are lowercased and trimmed independently; no
/// alias table applies to them.
pub fn canonicalize_hazard(report: &mut HazardReport) {
    report.hazard_types = canonical_tags(&report.hazard_types);
    report.bearing = fold_label(&report.bearing);
    report.proximity = fold_label(&report.proximity);
}

/// Canonicalize a guidance record in place.
///
/// Guidance records carry no category list, bearing, or proximity; nothing
/// to normalize at this stage.
pub fn canonicalize_guidance(_report: &mut GuidanceReport) {}
