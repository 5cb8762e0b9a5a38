//! Data layer - Rule tables and static mappings
//!
//! This module contains all static data used for the conversion:
//! - Rewrite rule tables (builtin set, optional JSON loading)
//! - Container classification for converted div blocks
//! - Code-fence language to LiaScript runner mappings

pub mod containers;
pub mod rules;
pub mod runners;

// Re-export commonly used items
pub use containers::{
    container_label, is_code_container, is_known_container, is_labeled_container,
    is_quote_container, CONTAINER_LABELS,
};
pub use rules::{
    BoxBuilder, BoxRule, EnvironmentRule, FormatStyle, MultiParamRule, RuleSet, RuleWrapper,
    SimpleRule, SpecialAction, SpecialRule, TextRule, TitleFormat,
};
pub use runners::{runner_for, LANGUAGE_RUNNERS};
