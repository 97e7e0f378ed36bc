//! # Reference Data Module
//!
//! Read-only reference tables consumed by the label engine:
//!
//! - Allergen synonym table, split into mandatory and recommended tiers
//! - Additive rules: umbrella categories, always-declared names, display priority
//!   and the exemption list
//! - Standard compound ingredients with their inherent allergens and the
//!   omission threshold
//!
//! The tables ship as JSON under `data/` and are embedded at compile time. A
//! directory can override them at startup. All lookup structures (normalized
//! search terms, tier map, membership sets) are built once at load time and the
//! result is immutable, so one `ReferenceData` can be shared across threads.

use crate::errors::{error_logging, AppError, AppResult};
use crate::text_processing::normalize_for_matching;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

const BUNDLED_ALLERGENS: &str = include_str!("../data/allergens.json");
const BUNDLED_ADDITIVES: &str = include_str!("../data/additives.json");
const BUNDLED_STANDARD_INGREDIENTS: &str = include_str!("../data/standard_ingredients.json");

pub const ALLERGENS_FILE: &str = "allergens.json";
pub const ADDITIVES_FILE: &str = "additives.json";
pub const STANDARD_INGREDIENTS_FILE: &str = "standard_ingredients.json";

/// Declaration priority class of an allergen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllergenTier {
    /// Must be declared (特定原材料)
    Mandatory,
    /// Declaration recommended (特定原材料に準ずるもの)
    Recommended,
}

/// One allergen with its alternate spellings
#[derive(Debug, Clone, PartialEq)]
pub struct AllergenEntry {
    pub canonical_name: String,
    pub tier: AllergenTier,
    pub alternate_spellings: Vec<String>,
    /// Canonical name and alternates, normalized
    search_terms: Vec<String>,
}

impl AllergenEntry {
    /// Normalized terms that identify this allergen in free text
    pub fn search_terms(&self) -> &[String] {
        &self.search_terms
    }
}

/// Allergen table with a precomputed tier lookup
#[derive(Debug, Clone)]
pub struct AllergenTable {
    entries: Vec<AllergenEntry>,
    tiers: HashMap<String, AllergenTier>,
}

impl AllergenTable {
    pub fn entries(&self) -> &[AllergenEntry] {
        &self.entries
    }

    /// Tier of a canonical allergen name, if it is in the table
    pub fn tier_of(&self, canonical_name: &str) -> Option<AllergenTier> {
        self.tiers.get(canonical_name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Additive declaration rules
#[derive(Debug, Clone)]
pub struct AdditiveRules {
    umbrella_categories: Vec<String>,
    umbrella_set: HashSet<String>,
    always_declared: HashSet<String>,
    display_priority: Vec<String>,
    exempt: HashSet<String>,
}

impl AdditiveRules {
    /// Umbrella category names in rendering order
    pub fn umbrella_categories(&self) -> &[String] {
        &self.umbrella_categories
    }

    pub fn is_umbrella(&self, category: &str) -> bool {
        self.umbrella_set.contains(category)
    }

    pub fn is_always_declared(&self, name: &str) -> bool {
        self.always_declared.contains(name)
    }

    /// Whether the additive is exempt from declaration and must be dropped
    pub fn is_exempt(&self, name: &str) -> bool {
        self.exempt.contains(name)
    }

    /// Prefixes that are pulled to the front of the additive list, in order
    pub fn display_priority(&self) -> &[String] {
        &self.display_priority
    }
}

/// A compound ingredient with a recognized standard composition
#[derive(Debug, Clone, PartialEq)]
pub struct StandardCompoundIngredient {
    pub canonical_name: String,
    pub alternate_spellings: Vec<String>,
    pub inherent_allergens: Vec<String>,
    search_terms: Vec<String>,
}

/// Standard compound ingredients and the process-wide omission threshold
#[derive(Debug, Clone)]
pub struct StandardIngredientTable {
    entries: Vec<StandardCompoundIngredient>,
    omission_threshold_percent: f64,
}

impl StandardIngredientTable {
    /// Find the standard entry an ingredient name refers to.
    ///
    /// The name matches when its normalized form contains the canonical name or
    /// one of the alternates, so `濃口醤油` resolves to `醤油`.
    pub fn find(&self, ingredient_name: &str) -> Option<&StandardCompoundIngredient> {
        let normalized = normalize_for_matching(ingredient_name);
        if normalized.is_empty() {
            return None;
        }
        self.entries.iter().find(|entry| {
            entry
                .search_terms
                .iter()
                .any(|term| normalized.contains(term.as_str()))
        })
    }

    /// Share of total weight, in percent, below which the sub-ingredient breakdown may be omitted
    pub fn omission_threshold_percent(&self) -> f64 {
        self.omission_threshold_percent
    }

    pub fn entries(&self) -> &[StandardCompoundIngredient] {
        &self.entries
    }
}

/// All reference tables, loaded once per process
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub allergens: AllergenTable,
    pub additives: AdditiveRules,
    pub standard_ingredients: StandardIngredientTable,
}

#[derive(Debug, Deserialize)]
struct RawAllergen {
    name: String,
    #[serde(default)]
    alternatives: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawAllergenFile {
    mandatory: Vec<RawAllergen>,
    recommended: Vec<RawAllergen>,
}

#[derive(Debug, Deserialize)]
struct RawAdditiveFile {
    umbrella_categories: Vec<String>,
    #[serde(default)]
    always_declared: Vec<String>,
    #[serde(default)]
    display_priority: Vec<String>,
    /// Exemption reason → additive names
    #[serde(default)]
    exempt: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawStandardIngredient {
    name: String,
    #[serde(default)]
    alternatives: Vec<String>,
    #[serde(default)]
    allergens: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawStandardIngredientFile {
    omission_threshold_percent: f64,
    ingredients: Vec<RawStandardIngredient>,
}

impl ReferenceData {
    /// Tables embedded in the binary
    pub fn bundled() -> AppResult<Self> {
        Self::from_json_strs(
            BUNDLED_ALLERGENS,
            BUNDLED_ADDITIVES,
            BUNDLED_STANDARD_INGREDIENTS,
        )
    }

    /// Load tables from `dir` when given, falling back to the bundled tables.
    ///
    /// An override directory that cannot be read or parsed is logged and ignored;
    /// the bundled tables themselves must always be valid.
    pub fn load(dir: Option<&Path>) -> AppResult<Self> {
        if let Some(dir) = dir {
            info!(
                "Loading reference data from directory: {}",
                dir.display()
            );
            match Self::from_dir(dir) {
                Ok(data) => {
                    info!(
                        allergens = data.allergens.len(),
                        standard_ingredients = data.standard_ingredients.entries().len(),
                        "Successfully loaded reference data from: {}",
                        dir.display()
                    );
                    return Ok(data);
                }
                Err(e) => {
                    let path = dir.display().to_string();
                    error_logging::log_reference_data_error(&e, "all", Some(path.as_str()));
                    warn!(
                        "Failed to load reference data from '{}': {}. Falling back to bundled tables.",
                        path, e
                    );
                }
            }
        }

        let data = Self::bundled()?;
        debug!(
            allergens = data.allergens.len(),
            "Using bundled reference data"
        );
        Ok(data)
    }

    /// Load all three tables from JSON files in `dir`
    pub fn from_dir(dir: &Path) -> AppResult<Self> {
        let read = |file: &str| -> AppResult<String> {
            let path = dir.join(file);
            fs::read_to_string(&path).map_err(|e| {
                AppError::FileSystem(format!("Failed to read '{}': {}", path.display(), e))
            })
        };

        Self::from_json_strs(
            &read(ALLERGENS_FILE)?,
            &read(ADDITIVES_FILE)?,
            &read(STANDARD_INGREDIENTS_FILE)?,
        )
    }

    /// Parse, validate and index the three tables
    pub fn from_json_strs(
        allergens_json: &str,
        additives_json: &str,
        standard_ingredients_json: &str,
    ) -> AppResult<Self> {
        let allergens: RawAllergenFile = parse_table(ALLERGENS_FILE, allergens_json)?;
        let additives: RawAdditiveFile = parse_table(ADDITIVES_FILE, additives_json)?;
        let standard: RawStandardIngredientFile =
            parse_table(STANDARD_INGREDIENTS_FILE, standard_ingredients_json)?;

        let data = Self {
            allergens: build_allergen_table(allergens)?,
            additives: build_additive_rules(additives)?,
            standard_ingredients: build_standard_table(standard)?,
        };
        data.validate()?;
        Ok(data)
    }

    /// Cross-table validation
    pub fn validate(&self) -> AppResult<()> {
        for entry in self.standard_ingredients.entries() {
            for allergen in &entry.inherent_allergens {
                if self.allergens.tier_of(allergen).is_none() {
                    warn!(
                        ingredient = %entry.canonical_name,
                        allergen = %allergen,
                        "Inherent allergen is not in the allergen table; it will be declared as recommended"
                    );
                }
            }
        }
        Ok(())
    }
}

fn parse_table<T: for<'de> Deserialize<'de>>(table: &str, json: &str) -> AppResult<T> {
    serde_json::from_str(json)
        .map_err(|e| AppError::ReferenceData(format!("Failed to parse {}: {}", table, e)))
}

fn build_allergen_table(raw: RawAllergenFile) -> AppResult<AllergenTable> {
    let mut entries = Vec::new();
    let mut tiers = HashMap::new();

    let tiered = raw
        .mandatory
        .into_iter()
        .map(|a| (a, AllergenTier::Mandatory))
        .chain(
            raw.recommended
                .into_iter()
                .map(|a| (a, AllergenTier::Recommended)),
        );

    for (allergen, tier) in tiered {
        let canonical_name = allergen.name.trim().to_string();
        if canonical_name.is_empty() {
            return Err(AppError::ReferenceData(
                "Allergen name cannot be empty".to_string(),
            ));
        }
        if tiers.insert(canonical_name.clone(), tier).is_some() {
            return Err(AppError::ReferenceData(format!(
                "Allergen '{}' is listed more than once",
                canonical_name
            )));
        }

        let search_terms = searchable_terms(&canonical_name, &allergen.alternatives);
        entries.push(AllergenEntry {
            canonical_name,
            tier,
            alternate_spellings: allergen.alternatives,
            search_terms,
        });
    }

    Ok(AllergenTable { entries, tiers })
}

fn build_additive_rules(raw: RawAdditiveFile) -> AppResult<AdditiveRules> {
    if raw.umbrella_categories.is_empty() {
        return Err(AppError::ReferenceData(
            "umbrella_categories cannot be empty".to_string(),
        ));
    }

    let check_names = |names: &[String], list: &str| -> AppResult<()> {
        for (i, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(AppError::ReferenceData(format!(
                    "{}[{}] cannot be empty",
                    list, i
                )));
            }
        }
        Ok(())
    };
    check_names(&raw.umbrella_categories, "umbrella_categories")?;
    check_names(&raw.always_declared, "always_declared")?;
    check_names(&raw.display_priority, "display_priority")?;
    for (reason, names) in &raw.exempt {
        check_names(names, format!("exempt.{}", reason).as_str())?;
    }

    let umbrella_set = raw.umbrella_categories.iter().cloned().collect();
    let always_declared = raw.always_declared.into_iter().collect();
    let exempt = raw.exempt.into_values().flatten().collect();

    Ok(AdditiveRules {
        umbrella_categories: raw.umbrella_categories,
        umbrella_set,
        always_declared,
        display_priority: raw.display_priority,
        exempt,
    })
}

fn build_standard_table(raw: RawStandardIngredientFile) -> AppResult<StandardIngredientTable> {
    let threshold = raw.omission_threshold_percent;
    if !(threshold > 0.0 && threshold <= 100.0) {
        return Err(AppError::ReferenceData(format!(
            "omission_threshold_percent must be in (0, 100], got {}",
            threshold
        )));
    }

    let mut entries = Vec::with_capacity(raw.ingredients.len());
    for ingredient in raw.ingredients {
        let canonical_name = ingredient.name.trim().to_string();
        if canonical_name.is_empty() {
            return Err(AppError::ReferenceData(
                "Standard ingredient name cannot be empty".to_string(),
            ));
        }
        let search_terms = searchable_terms(&canonical_name, &ingredient.alternatives);
        entries.push(StandardCompoundIngredient {
            canonical_name,
            alternate_spellings: ingredient.alternatives,
            inherent_allergens: ingredient.allergens,
            search_terms,
        });
    }

    Ok(StandardIngredientTable {
        entries,
        omission_threshold_percent: threshold,
    })
}

/// Normalized, deduplicated canonical name plus alternates; blank alternates are dropped
fn searchable_terms(canonical_name: &str, alternates: &[String]) -> Vec<String> {
    let mut terms: Vec<String> = Vec::with_capacity(alternates.len() + 1);
    for term in std::iter::once(canonical_name).chain(alternates.iter().map(String::as_str)) {
        let normalized = normalize_for_matching(term);
        if !normalized.is_empty() && !terms.contains(&normalized) {
            terms.push(normalized);
        }
    }
    terms
}
