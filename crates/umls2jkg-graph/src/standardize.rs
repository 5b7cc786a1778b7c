//! Standardized identifiers for codes and terms from UMLS vocabularies.
//!
//! The desired identifier format is CURIE (Compact URI): `<SAB>:<CODE>`,
//! where SAB is the Source ABbreviation of the contributing vocabulary.
//!
//! Most UMLS vocabularies already conform. The exceptions handled here:
//!
//! - a small number embed their own SAB inside the code (GO uses
//!   `GO:GO:12345`), so ids with more than two colon segments collapse to
//!   `<first>:<last>`;
//! - some codes contain special characters (`,` `/` space `<` `>` `+` `*`
//!   `&` `#`), replaced by a fixed, ordered substitution table;
//! - some natural-language terms coincidentally look like CURIEs and would
//!   collide with real identifiers elsewhere in the graph; those get a
//!   trailing `:` marker.

use regex::Regex;
use std::sync::OnceLock;

/// Ordered, literal character substitutions applied to identifiers.
const SUBSTITUTIONS: [(&str, &str); 9] = [
    (",", "_"),
    ("/", "_"),
    (" ", "_"),
    ("<", "__"),
    (">", "_"),
    ("+", "-"),
    ("*", "-"),
    ("&", "."),
    ("#", "."),
];

/// Concatenate a source abbreviation and a raw code into a CURIE-like id.
pub fn create_code_id(sab: &str, code: &str) -> String {
    format!("{sab}:{code}")
}

/// Standardize a CURIE-like id: collapse an embedded SAB, then replace
/// special characters.
///
/// Idempotent on outputs that no longer contain any special character and
/// do not re-acquire more than two colon segments; an adversarial code with
/// a literal `:` inside it is collapsed rather than escaped (see tests).
pub fn standardize_code_id(code_id: &str) -> String {
    let segments: Vec<&str> = code_id.split(':').collect();
    let mut id = if segments.len() > 2 {
        format!("{}:{}", segments[0], segments[segments.len() - 1])
    } else {
        code_id.to_string()
    };
    for (from, to) in SUBSTITUTIONS {
        id = id.replace(from, to);
    }
    id
}

fn curie_shaped() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._-]+:[A-Za-z0-9._-]+$").expect("CURIE pattern")
    })
}

/// Append a trailing `:` to a term that resembles a CURIE, leaving every
/// other term unchanged.
pub fn standardize_term(term: &str) -> String {
    if curie_shaped().is_match(term) {
        format!("{term}:")
    } else {
        term.to_string()
    }
}
