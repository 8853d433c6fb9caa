//! Side-by-side comparison of two variants.

use std::collections::VecDeque;

use serde::Serialize;

use crate::review::variants::{EditableVariant, VariantField};

/// How many variants can be compared at once.
pub const COMPARE_DEPTH: usize = 2;

/// Most-recently-selected variants, oldest first. Never holds more than `COMPARE_DEPTH`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompareSelection {
    order: VecDeque<String>,
}

impl CompareSelection {
    /// Selects `id`, evicting the least recently selected entry when full.
    /// Re-selecting refreshes recency.
    pub fn select(&mut self, id: &str) {
        self.order.retain(|s| s != id);
        self.order.push_back(id.to_string());
        while self.order.len() > COMPARE_DEPTH {
            self.order.pop_front();
        }
    }

    /// Tops the selection up from `ids`, in order, until it is full.
    pub fn fill_from<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        for id in ids {
            if self.order.len() >= COMPARE_DEPTH {
                break;
            }
            if !self.contains(id) {
                self.order.push_back(id.to_string());
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.order.iter().any(|s| s == id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn ids(&self) -> Vec<String> {
        self.order.iter().cloned().collect()
    }

    pub fn pair(&self) -> Option<(&str, &str)> {
        match (self.order.front(), self.order.back()) {
            (Some(a), Some(b)) if self.order.len() == COMPARE_DEPTH => {
                Some((a.as_str(), b.as_str()))
            }
            _ => None,
        }
    }
}

/// Fields flagged when they differ between the two compared variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareField {
    Headline,
    PrimaryText,
    Description,
    Cta,
    HookTechnique,
    Tone,
    VariantType,
}

/// Fields whose displayed values differ between `a` and `b`.
pub fn differing_fields(a: &EditableVariant, b: &EditableVariant) -> Vec<CompareField> {
    let differs = |field: VariantField| a.get(field) != b.get(field);
    let checks = [
        (CompareField::Headline, differs(VariantField::Headline)),
        (CompareField::PrimaryText, differs(VariantField::PrimaryText)),
        (CompareField::Description, differs(VariantField::Description)),
        (CompareField::Cta, a.original.cta != b.original.cta),
        (
            CompareField::HookTechnique,
            a.original.hook_technique != b.original.hook_technique,
        ),
        (CompareField::Tone, a.original.tone != b.original.tone),
        (
            CompareField::VariantType,
            a.original.variant_type != b.original.variant_type,
        ),
    ];
    checks
        .into_iter()
        .filter_map(|(field, differs)| differs.then_some(field))
        .collect()
}
