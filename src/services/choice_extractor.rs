//! Splits a choices region into a letter→text mapping.
//!
//! OCR output repeats letters ("A ... A ...") often enough that
//! dropping content is not acceptable: a duplicate letter is
//! reallocated to the first free slot of a fixed fallback order, and
//! when every slot is taken the text is appended to the original
//! letter instead of overwriting it.

use crate::utils::text::compact_spaces;
use phf::phf_map;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Fallback order per letter when its slot is already taken.
static REALLOC_ORDER: phf::Map<char, [char; 4]> = phf_map! {
    'A' => ['B', 'C', 'D', 'E'],
    'B' => ['C', 'D', 'E', 'A'],
    'C' => ['D', 'E', 'A', 'B'],
    'D' => ['E', 'A', 'B', 'C'],
    'E' => ['A', 'B', 'C', 'D'],
};

fn marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // "A) ", "A. " after a break or spaces, or the "A - " dash form.
    RE.get_or_init(|| {
        Regex::new(r"(?:\r?\n|\s+)([A-E])[).]\s+|(?:\r?\n|\s+)([A-E])\s*-\s*").unwrap()
    })
}

/// Extracts choices from a region string. Empty input yields an empty
/// mapping; text before the first letter marker is discarded.
pub fn extract_choices(region: &str) -> BTreeMap<char, String> {
    let mut choices: BTreeMap<char, String> = BTreeMap::new();
    if region.trim().is_empty() {
        return choices;
    }

    // Interleave plain fragments with the captured marker letters so
    // they can be walked left to right with a pending letter.
    let mut fragments: Vec<String> = Vec::new();
    let mut last = 0;
    for caps in marker_re().captures_iter(region) {
        let whole = caps.get(0).unwrap();
        fragments.push(region[last..whole.start()].to_string());
        let letter = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|g| g.as_str().to_string())
            .unwrap_or_default();
        fragments.push(letter);
        last = whole.end();
    }
    fragments.push(region[last..].to_string());

    let mut pending: Option<char> = None;
    for fragment in &fragments {
        let fragment = fragment.trim();
        if fragment.len() == 1 && ('A'..='E').contains(&fragment.chars().next().unwrap()) {
            pending = Some(fragment.chars().next().unwrap());
            continue;
        }
        if let Some(letter) = pending {
            if !fragment.is_empty() {
                assign(&mut choices, letter, compact_spaces(fragment));
                pending = None;
            }
        }
    }

    // Binary normalization: a CERTO/ERRADO buried in extra text (page
    // footers, trailing periods) collapses to the bare word.
    for letter in ['A', 'B'] {
        if let Some(value) = choices.get_mut(&letter) {
            let upper = value.to_uppercase();
            if upper.contains("CERTO") {
                *value = "CERTO".to_string();
            } else if upper.contains("ERRADO") {
                *value = "ERRADO".to_string();
            }
        }
    }

    choices
}

fn assign(choices: &mut BTreeMap<char, String>, letter: char, value: String) {
    if !choices.contains_key(&letter) {
        choices.insert(letter, value);
        return;
    }
    if let Some(order) = REALLOC_ORDER.get(&letter) {
        for fallback in order {
            if !choices.contains_key(fallback) {
                tracing::debug!("letra {} duplicada, realocando para {}", letter, fallback);
                choices.insert(*fallback, value);
                return;
            }
        }
    }
    // All five slots taken: append rather than lose the content.
    if let Some(existing) = choices.get_mut(&letter) {
        *existing = compact_spaces(&format!("{existing} {value}"));
    }
}
