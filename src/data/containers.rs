//! Container type tables for the div-block pass
//!
//! Class names arriving from converted LaTeX environments are grouped into
//! three presentation categories; everything else is an unknown container
//! and is left untouched. All lookups expect the lowercased type name.

use fxhash::FxHashSet;
use lazy_static::lazy_static;
use phf::phf_map;

/// Labels (with emoji) for the labeled container types
pub static CONTAINER_LABELS: phf::Map<&'static str, &'static str> = phf_map! {
    "hinweis" => "Hinweis ⚠️",
    "sprachvgl" => "Sprachvergleich 🗣️",
    "experten" => "Expertenwissen 🧠",
    "exkurs" => "Exkurs ⛕",
    "definitionskasten" => "Definition 📓",
};

/// Rendered as a plain blockquote, no label line
pub static QUOTE_CONTAINER_TYPES: &[&str] =
    &["universalkasten", "tcolorbox", "autorenkasten", "picture"];

/// Rendered as a labeled blockquote
pub static LABELED_CONTAINER_TYPES: &[&str] = &[
    "hinweis",
    "sprachvgl",
    "experten",
    "exkurs",
    "definitionskasten",
];

/// Rendered as a fenced code block
pub static CODE_CONTAINER_TYPES: &[&str] = &["codekurz", "ausgabe", "eingabe", "synkurz"];

lazy_static! {
    /// Every container type the div pass converts
    static ref KNOWN_CONTAINER_TYPES: FxHashSet<&'static str> = {
        let mut set = FxHashSet::default();
        set.extend(QUOTE_CONTAINER_TYPES.iter().copied());
        set.extend(LABELED_CONTAINER_TYPES.iter().copied());
        set.extend(CODE_CONTAINER_TYPES.iter().copied());
        set
    };
}

/// Whether the div pass converts this container type at all.
pub fn is_known_container(type_lower: &str) -> bool {
    KNOWN_CONTAINER_TYPES.contains(type_lower)
}

pub fn is_code_container(type_lower: &str) -> bool {
    CODE_CONTAINER_TYPES.contains(&type_lower)
}

pub fn is_quote_container(type_lower: &str) -> bool {
    QUOTE_CONTAINER_TYPES.contains(&type_lower)
}

pub fn is_labeled_container(type_lower: &str) -> bool {
    LABELED_CONTAINER_TYPES.contains(&type_lower)
}

/// Label line text for a labeled container; falls back to the type name.
pub fn container_label(type_lower: &str) -> &str {
    CONTAINER_LABELS
        .get(type_lower)
        .copied()
        .unwrap_or(type_lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_membership() {
        assert!(is_known_container("hinweis"));
        assert!(is_known_container("universalkasten"));
        assert!(is_known_container("ausgabe"));
        assert!(!is_known_container("kommlititem"));
        assert!(!is_known_container("text"));
    }

    #[test]
    fn test_labels() {
        assert_eq!(container_label("hinweis"), "Hinweis ⚠️");
        assert_eq!(container_label("definitionskasten"), "Definition 📓");
        // Unmapped types fall back to the name itself
        assert_eq!(container_label("somethingelse"), "somethingelse");
    }

    #[test]
    fn test_categories_are_disjoint() {
        for t in CODE_CONTAINER_TYPES {
            assert!(!is_quote_container(t));
            assert!(!is_labeled_container(t));
        }
        for t in QUOTE_CONTAINER_TYPES {
            assert!(!is_labeled_container(t));
        }
    }
}
