use food_labeler::allergens::{AllergenMatcher, DeclaredAllergens};
use food_labeler::reference_data::{AllergenTier, ReferenceData};

fn with_matcher<F: FnOnce(AllergenMatcher<'_>)>(f: F) {
    let data = ReferenceData::bundled().unwrap();
    f(AllergenMatcher::new(&data.allergens));
}

#[test]
fn test_mandatory_allergens_detected() {
    with_matcher(|matcher| {
        let allergens = matcher.find_allergens("小麦粉、卵、乳製品、えび");
        for expected in ["小麦", "卵", "乳", "えび"] {
            assert!(allergens.contains(&expected.to_string()), "missing {}", expected);
        }
    });
}

#[test]
fn test_recommended_allergens_detected() {
    with_matcher(|matcher| {
        let allergens = matcher.find_allergens("大豆油、りんご、ごま油");
        assert_eq!(allergens.len(), 3);
        for expected in ["大豆", "りんご", "ごま"] {
            assert!(allergens.contains(&expected.to_string()), "missing {}", expected);
        }
    });
}

#[test]
fn test_alternate_spellings_map_to_canonical_names() {
    with_matcher(|matcher| {
        let allergens = matcher.find_allergens("玉子、落花生（ピーナッツ）、海老");
        assert_eq!(allergens.len(), 3);
        for expected in ["卵", "落花生", "えび"] {
            assert!(allergens.contains(&expected.to_string()), "missing {}", expected);
        }
    });
}

#[test]
fn test_matching_ignores_case() {
    with_matcher(|matcher| {
        assert_eq!(matcher.find_allergens("WHEAT flour"), vec!["小麦"]);
        assert_eq!(matcher.find_allergens("Soy lecithin"), vec!["大豆"]);
    });
}

#[test]
fn test_results_sorted_and_deduplicated() {
    with_matcher(|matcher| {
        let allergens = matcher.find_allergens("大豆、だいず、小麦、こむぎ、大豆");
        assert_eq!(allergens, vec!["大豆", "小麦"]);
    });
}

#[test]
fn test_no_allergens_in_plain_text() {
    with_matcher(|matcher| {
        assert!(matcher.find_allergens("もち米、米こうじ、醸造アルコール、糖類").is_empty());
        assert!(matcher.find_allergens("").is_empty());
    });
}

#[test]
fn test_tier_lookup() {
    with_matcher(|matcher| {
        assert_eq!(matcher.tier_of("小麦"), AllergenTier::Mandatory);
        assert_eq!(matcher.tier_of("大豆"), AllergenTier::Recommended);
        // unknown names are declared with the recommended tier
        assert_eq!(matcher.tier_of("からし"), AllergenTier::Recommended);
    });
}

#[test]
fn test_declared_allergens_classify_by_tier() {
    with_matcher(|matcher| {
        let mut declared = DeclaredAllergens::new();
        declared.extend_classified(&matcher, ["大豆", "小麦", "ごま", "卵", "小麦"]);

        assert_eq!(declared.len(), 4);
        assert_eq!(declared.mandatory().collect::<Vec<_>>(), vec!["卵", "小麦"]);
        assert_eq!(declared.recommended().collect::<Vec<_>>(), vec!["ごま", "大豆"]);
        assert_eq!(declared.disclosure_order(), vec!["卵", "小麦", "ごま", "大豆"]);
    });
}
