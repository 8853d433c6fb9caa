use serde::{Deserialize, Serialize};

use crate::models::variant::GeneratedVariant;

/// Fields the merchant may rewrite during review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantField {
    Headline,
    PrimaryText,
    Description,
}

/// A generated variant plus the merchant's overrides.
///
/// Overrides start out equal to the generated text. Every read prefers the override.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditableVariant {
    pub original: GeneratedVariant,
    pub edited_headline: Option<String>,
    pub edited_primary_text: Option<String>,
    pub edited_description: Option<String>,
}

impl EditableVariant {
    pub fn new(original: GeneratedVariant) -> Self {
        Self {
            edited_headline: Some(original.headline.clone()),
            edited_primary_text: Some(original.primary_text.clone()),
            edited_description: original.description.clone(),
            original,
        }
    }

    pub fn id(&self) -> &str {
        &self.original.id
    }

    pub fn headline(&self) -> &str {
        self.edited_headline
            .as_deref()
            .unwrap_or(&self.original.headline)
    }

    pub fn primary_text(&self) -> &str {
        self.edited_primary_text
            .as_deref()
            .unwrap_or(&self.original.primary_text)
    }

    pub fn description(&self) -> Option<&str> {
        self.edited_description
            .as_deref()
            .or(self.original.description.as_deref())
    }

    pub fn get(&self, field: VariantField) -> Option<&str> {
        match field {
            VariantField::Headline => Some(self.headline()),
            VariantField::PrimaryText => Some(self.primary_text()),
            VariantField::Description => self.description(),
        }
    }

    pub fn set(&mut self, field: VariantField, value: String) {
        match field {
            VariantField::Headline => self.edited_headline = Some(value),
            VariantField::PrimaryText => self.edited_primary_text = Some(value),
            VariantField::Description => self.edited_description = Some(value),
        }
    }

    pub fn is_edited(&self) -> bool {
        self.headline() != self.original.headline
            || self.primary_text() != self.original.primary_text
            || self.description() != self.original.description.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::fake::sample_variant;

    #[test]
    fn test_new_variant_overrides_equal_originals() {
        let variant = EditableVariant::new(sample_variant(1));
        assert_eq!(variant.edited_headline.as_deref(), Some("Headline 1"));
        assert_eq!(variant.edited_primary_text.as_deref(), Some("Primary text 1"));
        assert_eq!(variant.edited_description.as_deref(), Some("Description 1"));
        assert!(!variant.is_edited());
    }

    #[test]
    fn test_set_then_get_round_trips() {
        let mut variant = EditableVariant::new(sample_variant(1));
        for field in [
            VariantField::Headline,
            VariantField::PrimaryText,
            VariantField::Description,
        ] {
            for value in ["New copy", "", "  padded  "] {
                variant.set(field, value.to_string());
                assert_eq!(variant.get(field), Some(value));
            }
        }
        assert!(variant.is_edited());
    }

    #[test]
    fn test_reads_fall_back_to_original_without_override() {
        let mut variant = EditableVariant::new(sample_variant(2));
        variant.edited_headline = None;
        variant.edited_description = None;
        assert_eq!(variant.headline(), "Headline 2");
        assert_eq!(variant.description(), Some("Description 2"));
    }

    #[test]
    fn test_description_can_be_added_when_original_has_none() {
        let mut original = sample_variant(1);
        original.description = None;
        let mut variant = EditableVariant::new(original);
        assert_eq!(variant.description(), None);
        variant.set(VariantField::Description, "Free shipping".to_string());
        assert_eq!(variant.description(), Some("Free shipping"));
    }
}
