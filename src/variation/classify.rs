//! Attribute classification.

use super::keywords::{normalize_text, KeywordFamilies};
use super::{KindOverride, VariationConfig, VariationKind};
use tracing::trace;

const NAMESPACE_PREFIXES: &[&str] = &["attribute_", "pa_"];

/// Decides the presentation kind of an attribute from its machine name, falling back
/// to its human-readable label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    families: KeywordFamilies,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            families: KeywordFamilies::builtin(),
        }
    }
}

impl Classifier {
    pub fn new(families: KeywordFamilies) -> Self {
        Self { families }
    }

    pub fn from_config(config: &VariationConfig) -> Self {
        Self::new(KeywordFamilies::from_config(config))
    }

    pub fn classify(&self, name: &str, label: &str, kind_override: KindOverride) -> VariationKind {
        if let Some(kind) = kind_override.fixed() {
            return kind;
        }

        let machine = strip_namespace(name);
        let kind = self
            .by_machine_name(&machine)
            .or_else(|| self.by_label(label))
            .unwrap_or(VariationKind::Text);
        trace!(name, label, ?kind, "Classified attribute");
        kind
    }

    fn by_machine_name(&self, machine: &str) -> Option<VariationKind> {
        let matches = |words: &[String]| words.iter().any(|w| name_matches(machine, w));
        if matches(&self.families.color) {
            Some(VariationKind::Color)
        } else if matches(&self.families.image) {
            Some(VariationKind::Thumbnail)
        } else if matches(&self.families.size) {
            Some(VariationKind::Text)
        } else {
            None
        }
    }

    fn by_label(&self, label: &str) -> Option<VariationKind> {
        let label = normalize_text(label);
        if label.is_empty() {
            return None;
        }
        let contains = |words: &[String]| {
            words
                .iter()
                .map(|w| normalize_text(w))
                .any(|w| !w.is_empty() && label.contains(&w))
        };
        if contains(&self.families.color) {
            Some(VariationKind::Color)
        } else if contains(&self.families.image) {
            Some(VariationKind::Thumbnail)
        } else if contains(&self.families.size) {
            Some(VariationKind::Text)
        } else {
            None
        }
    }
}

/// Classify with the built-in keyword families.
pub fn classify(name: &str, label: &str, kind_override: KindOverride) -> VariationKind {
    Classifier::default().classify(name, label, kind_override)
}

fn strip_namespace(name: &str) -> String {
    let mut machine = name.trim().to_lowercase();
    for prefix in NAMESPACE_PREFIXES {
        if let Some(rest) = machine.strip_prefix(prefix) {
            machine = rest.to_string();
        }
    }
    machine
}

/// Exact match, or `keyword-…` / `keyword_…`.
fn name_matches(machine: &str, keyword: &str) -> bool {
    if machine == keyword {
        return true;
    }
    machine
        .strip_prefix(keyword)
        .map(|rest| rest.starts_with('-') || rest.starts_with('_'))
        .unwrap_or(false)
}
