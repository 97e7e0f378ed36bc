//! # Allergen Matching
//!
//! Case-insensitive substring detection of allergens in free text, and the
//! tier-partitioned accumulator used when a whole product is labeled.

use crate::reference_data::{AllergenTable, AllergenTier};
use crate::text_processing::normalize_for_matching;
use std::collections::BTreeSet;
use tracing::trace;

/// Scans text for allergens listed in an [`AllergenTable`]
#[derive(Debug, Clone, Copy)]
pub struct AllergenMatcher<'a> {
    table: &'a AllergenTable,
}

impl<'a> AllergenMatcher<'a> {
    pub fn new(table: &'a AllergenTable) -> Self {
        Self { table }
    }

    /// Canonical names of every allergen whose name or alternate spelling occurs in `text`.
    ///
    /// Each table entry is tested independently, so one text can match several
    /// allergens. The result is deduplicated and sorted.
    pub fn find_allergens(&self, text: &str) -> Vec<String> {
        let haystack = normalize_for_matching(text);
        if haystack.is_empty() {
            return Vec::new();
        }

        let found: BTreeSet<&str> = self
            .table
            .entries()
            .iter()
            .filter(|entry| {
                entry
                    .search_terms()
                    .iter()
                    .any(|term| haystack.contains(term.as_str()))
            })
            .map(|entry| entry.canonical_name.as_str())
            .collect();

        trace!(text = %text, matches = found.len(), "Allergen scan complete");
        found.into_iter().map(str::to_string).collect()
    }

    /// Tier used for declaration; names missing from the table count as recommended
    pub fn tier_of(&self, canonical_name: &str) -> AllergenTier {
        self.table
            .tier_of(canonical_name)
            .unwrap_or(AllergenTier::Recommended)
    }
}

/// Product-level allergen accumulator, deduplicated and sorted per tier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredAllergens {
    mandatory: BTreeSet<String>,
    recommended: BTreeSet<String>,
}

impl DeclaredAllergens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, tier: AllergenTier) {
        match tier {
            AllergenTier::Mandatory => self.mandatory.insert(name.into()),
            AllergenTier::Recommended => self.recommended.insert(name.into()),
        };
    }

    /// Add names, classifying each through the matcher's tier lookup
    pub fn extend_classified<I, S>(&mut self, matcher: &AllergenMatcher<'_>, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let name = name.as_ref();
            self.insert(name, matcher.tier_of(name));
        }
    }

    pub fn mandatory(&self) -> impl Iterator<Item = &str> {
        self.mandatory.iter().map(String::as_str)
    }

    pub fn recommended(&self) -> impl Iterator<Item = &str> {
        self.recommended.iter().map(String::as_str)
    }

    /// Names in disclosure order: mandatory tier first, then recommended
    pub fn disclosure_order(&self) -> Vec<&str> {
        self.mandatory().chain(self.recommended()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.mandatory.is_empty() && self.recommended.is_empty()
    }

    pub fn len(&self) -> usize {
        self.mandatory.len() + self.recommended.len()
    }
}
