use crate::errors::{AppError, AppResult, LabelError, LabelResult};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use unic_langid::LanguageIdentifier;

/// Locale of the bundled label vocabulary
pub const LABEL_LOCALE: &str = "ja";

const BUNDLED_LABEL_FTL: &str = include_str!("../locales/ja/label.ftl");

/// Fixed phrase templates printed on food labels
///
/// Backed by a thread-safe Fluent bundle so one instance can serve concurrent
/// label generations.
pub struct LabelVocabulary {
    bundle: FluentBundle<FluentResource>,
}

impl std::fmt::Debug for LabelVocabulary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelVocabulary").finish_non_exhaustive()
    }
}

impl LabelVocabulary {
    /// Create the vocabulary from the bundled resource
    pub fn new() -> AppResult<Self> {
        Self::from_ftl(LABEL_LOCALE, BUNDLED_LABEL_FTL.to_string())
    }

    /// Create a vocabulary from Fluent source text
    pub fn from_ftl(locale: &str, source: String) -> AppResult<Self> {
        let locale: LanguageIdentifier = locale
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid locale '{}': {}", locale, e)))?;

        let resource = FluentResource::try_new(source).map_err(|(_, errors)| {
            AppError::Config(format!("Invalid label vocabulary: {:?}", errors))
        })?;

        let mut bundle = FluentBundle::new_concurrent(vec![locale]);
        // Unicode isolation marks would end up inside the printed label text
        bundle.set_use_isolating(false);
        bundle.add_resource(resource).map_err(|errors| {
            AppError::Config(format!("Conflicting label vocabulary entries: {:?}", errors))
        })?;

        Ok(Self { bundle })
    }

    /// Check whether a message exists
    pub fn has_message(&self, key: &str) -> bool {
        self.bundle.has_message(key)
    }

    /// Render a message with string arguments
    pub fn message(&self, key: &str, args: &[(&str, &str)]) -> LabelResult<String> {
        let msg = self
            .bundle
            .get_message(key)
            .ok_or_else(|| LabelError::GenerationFailure(format!("Missing label phrase: {}", key)))?;
        let pattern = msg.value().ok_or_else(|| {
            LabelError::GenerationFailure(format!("Missing value for label phrase: {}", key))
        })?;

        let mut fluent_args = FluentArgs::new();
        for (name, value) in args {
            fluent_args.set(*name, FluentValue::from(*value));
        }

        let mut errors = vec![];
        let value = self
            .bundle
            .format_pattern(pattern, Some(&fluent_args), &mut errors);
        if !errors.is_empty() {
            return Err(LabelError::GenerationFailure(format!(
                "Failed to render label phrase '{}': {:?}",
                key, errors
            )));
        }

        Ok(value.into_owned())
    }

    /// `name（origin製造）`
    pub fn origin_annotation(&self, name: &str, origin: &str) -> LabelResult<String> {
        self.message("origin-annotation", &[("name", name), ("origin", origin)])
    }

    /// `（一部に…を含む）` around already-joined allergen names
    pub fn allergen_disclosure(&self, allergens: &str) -> LabelResult<String> {
        self.message("allergen-disclosure", &[("allergens", allergens)])
    }

    /// Net content in grams below 1000 g, otherwise in kilograms
    pub fn net_content(&self, grams: f64) -> LabelResult<String> {
        let grams = if grams.is_finite() { grams } else { 0.0 };
        if grams >= 1000.0 {
            let amount = format_amount(grams / 1000.0);
            self.message("net-content-kilograms", &[("amount", amount.as_str())])
        } else {
            let amount = format_amount(grams);
            self.message("net-content-grams", &[("amount", amount.as_str())])
        }
    }
}

/// Shortest decimal form: `100`, `1.5`, `1`
///
/// Always positional, never exponent notation: `1e-7` prints as `0.0000001`
/// and `1e21` as `1000000000000000000000`. Realistic weights never reach
/// either range.
pub fn format_amount(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_vocabulary_has_all_phrases() {
        let vocabulary = LabelVocabulary::new().unwrap();
        for key in [
            "origin-annotation",
            "allergen-disclosure",
            "net-content-grams",
            "net-content-kilograms",
        ] {
            assert!(vocabulary.has_message(key), "missing {}", key);
        }
    }

    #[test]
    fn test_phrases_render_without_isolation_marks() {
        let vocabulary = LabelVocabulary::new().unwrap();
        assert_eq!(
            vocabulary.origin_annotation("大根", "国内").unwrap(),
            "大根（国内製造）"
        );
        assert_eq!(
            vocabulary.allergen_disclosure("小麦・大豆").unwrap(),
            "（一部に小麦・大豆を含む）"
        );
    }

    #[test]
    fn test_net_content_units() {
        let vocabulary = LabelVocabulary::new().unwrap();
        assert_eq!(vocabulary.net_content(999.0).unwrap(), "999g");
        assert_eq!(vocabulary.net_content(1000.0).unwrap(), "1kg");
        assert_eq!(vocabulary.net_content(1500.0).unwrap(), "1.5kg");
        assert_eq!(vocabulary.net_content(0.0).unwrap(), "0g");
        assert_eq!(vocabulary.net_content(f64::NAN).unwrap(), "0g");
        assert_eq!(vocabulary.net_content(12.5).unwrap(), "12.5g");
        assert_eq!(format_amount(1e-7), "0.0000001");
    }

    #[test]
    fn test_missing_phrase_is_generation_failure() {
        let vocabulary =
            LabelVocabulary::from_ftl("ja", "net-content-grams = { $amount }g\n".to_string())
                .unwrap();
        let err = vocabulary.origin_annotation("大根", "国内").unwrap_err();
        assert!(matches!(err, LabelError::GenerationFailure(_)));
    }

    #[test]
    fn test_invalid_locale_rejected() {
        assert!(LabelVocabulary::from_ftl("not a locale!", String::new()).is_err());
    }
}
