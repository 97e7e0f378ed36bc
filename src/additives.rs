//! # Additive Classification
//!
//! Turns the additive section of a composition text into the ordered list of
//! declarations printed on the label.
//!
//! - Always-declared names pass through untouched
//! - `category(contents)` groups of an umbrella category are collected and
//!   rendered once as `category(member、member)`
//! - Exempt additives (processing aids and the like) are dropped
//! - Everything else passes through as written
//!
//! The umbrella buckets live in a [`Classification`] created per call and are
//! never shared between calls.

use crate::reference_data::AdditiveRules;
use crate::text_processing::{parse_category_group, split_items, split_top_level};
use tracing::{debug, trace};

/// Separator between members of an umbrella group
pub const MEMBER_SEPARATOR: &str = "、";

/// Members collected for one umbrella category during a single classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UmbrellaBucket {
    pub category: String,
    pub members: Vec<String>,
}

impl UmbrellaBucket {
    /// `category(member、member)`, or `None` when nothing was collected
    pub fn render(&self) -> Option<String> {
        if self.members.is_empty() {
            return None;
        }
        Some(format!(
            "{}({})",
            self.category,
            self.members.join(MEMBER_SEPARATOR)
        ))
    }
}

/// Per-call classifier state: pass-through entries plus umbrella buckets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Entries emitted as written, in input order
    pub declared: Vec<String>,
    /// One bucket per umbrella category, in rule order
    pub umbrellas: Vec<UmbrellaBucket>,
}

impl Classification {
    fn new(rules: &AdditiveRules) -> Self {
        Self {
            declared: Vec::new(),
            umbrellas: rules
                .umbrella_categories()
                .iter()
                .map(|category| UmbrellaBucket {
                    category: category.clone(),
                    members: Vec::new(),
                })
                .collect(),
        }
    }

    /// Replace the members of `category`.
    ///
    /// A second group of the same category overwrites the first instead of
    /// merging with it.
    fn replace_members(&mut self, category: &str, members: Vec<String>) {
        if let Some(bucket) = self.umbrellas.iter_mut().find(|b| b.category == category) {
            if !bucket.members.is_empty() {
                debug!(
                    category = %category,
                    previous = ?bucket.members,
                    "Umbrella category repeated; keeping the last group only"
                );
            }
            bucket.members = members;
        }
    }

    /// Pass-through entries followed by the rendered umbrella groups
    pub fn into_entries(self) -> Vec<String> {
        let mut entries = self.declared;
        entries.extend(self.umbrellas.iter().filter_map(UmbrellaBucket::render));
        entries
    }
}

/// Classifies additive text according to [`AdditiveRules`]
#[derive(Debug, Clone, Copy)]
pub struct AdditiveClassifier<'a> {
    rules: &'a AdditiveRules,
}

impl<'a> AdditiveClassifier<'a> {
    pub fn new(rules: &'a AdditiveRules) -> Self {
        Self { rules }
    }

    /// Declarable additives of `text`, in display order.
    ///
    /// # Examples
    /// ```
    /// use food_labeler::additives::AdditiveClassifier;
    /// use food_labeler::reference_data::ReferenceData;
    ///
    /// let data = ReferenceData::bundled().unwrap();
    /// let classifier = AdditiveClassifier::new(&data.additives);
    /// let additives = classifier.classify("アルコール、甘味料(ステビア)、カラメル色素");
    /// assert_eq!(additives, vec!["カラメル色素", "甘味料(ステビア)"]);
    /// ```
    pub fn classify(&self, text: &str) -> Vec<String> {
        let classification = self.collect(text);
        self.order_for_display(classification.into_entries())
    }

    /// Sort tokens of `text` into pass-through entries and umbrella buckets
    pub fn collect(&self, text: &str) -> Classification {
        let mut classification = Classification::new(self.rules);

        for token in split_top_level(text) {
            if self.rules.is_always_declared(&token) {
                classification.declared.push(token);
                continue;
            }

            match parse_category_group(&token) {
                Some((category, _)) if self.rules.is_exempt(category) => {
                    trace!(token = %token, "Dropping exempt additive group");
                }
                Some((category, contents)) if self.rules.is_umbrella(category) => {
                    let category = category.to_string();
                    let members = split_items(contents);
                    classification.replace_members(&category, members);
                }
                Some(_) => classification.declared.push(token),
                None if self.rules.is_exempt(&token) => {
                    trace!(token = %token, "Dropping exempt additive");
                }
                None => classification.declared.push(token),
            }
        }

        classification
    }

    /// Pull the first entry for each priority prefix to the front, then append
    /// the rest in first-seen order without duplicates.
    pub fn order_for_display(&self, entries: Vec<String>) -> Vec<String> {
        let mut ordered: Vec<String> = Vec::with_capacity(entries.len());

        for prefix in self.rules.display_priority() {
            if let Some(entry) = entries.iter().find(|e| e.starts_with(prefix.as_str())) {
                if !ordered.contains(entry) {
                    ordered.push(entry.clone());
                }
            }
        }

        for entry in entries {
            if !ordered.contains(&entry) {
                ordered.push(entry);
            }
        }

        ordered
    }
}
