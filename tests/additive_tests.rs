use food_labeler::additives::AdditiveClassifier;
use food_labeler::compound::CompoundResolver;
use food_labeler::reference_data::ReferenceData;

const FULL_SOY_SAUCE_DETAIL: &str = "アミノ酸液、脱脂加工大豆、小麦、食塩、粉飴、氷糖蜜／カラメル色素、調味料(アミノ酸等)、甘味料(ステビア、甘草)、アルコール、保存料(パラオキシ安息香酸、安息香酸Na)";

#[test]
fn test_soy_sauce_composition_analysis() {
    let data = ReferenceData::bundled().unwrap();
    let analysis = CompoundResolver::new(&data).analyze(FULL_SOY_SAUCE_DETAIL);

    assert_eq!(analysis.allergens, vec!["大豆", "小麦"]);
    assert_eq!(
        analysis.additives,
        vec![
            "カラメル色素",
            "調味料(アミノ酸等)",
            "甘味料(ステビア、甘草)",
            "保存料(パラオキシ安息香酸、安息香酸Na)",
        ]
    );
    assert!(!analysis.additives.contains(&"アルコール".to_string()));
}

#[test]
fn test_short_soy_sauce_composition_analysis() {
    let service = food_labeler::LabelService::with_bundled_data().unwrap();
    let analysis = service
        .analyze_compound("アミノ酸液、脱脂加工大豆、小麦、食塩／カラメル色素、調味料(アミノ酸等)")
        .unwrap();

    assert_eq!(analysis.allergens, vec!["大豆", "小麦"]);
    assert_eq!(analysis.additives, vec!["カラメル色素", "調味料(アミノ酸等)"]);
}

#[test]
fn test_mirin_composition_analysis() {
    let data = ReferenceData::bundled().unwrap();
    let analysis =
        CompoundResolver::new(&data).analyze("もち米、米こうじ、醸造アルコール、糖類／調味料(アミノ酸等)");

    assert!(analysis.allergens.is_empty());
    assert_eq!(analysis.additives, vec!["調味料(アミノ酸等)"]);
}

#[test]
fn test_named_additives_pass_through() {
    let data = ReferenceData::bundled().unwrap();
    let classifier = AdditiveClassifier::new(&data.additives);

    assert_eq!(
        classifier.classify("カラメル色素、調味料(アミノ酸等)、甘味料(ステビア)"),
        vec!["カラメル色素", "調味料(アミノ酸等)", "甘味料(ステビア)"]
    );
}

#[test]
fn test_exempt_additives_are_dropped() {
    let data = ReferenceData::bundled().unwrap();
    let classifier = AdditiveClassifier::new(&data.additives);

    assert_eq!(
        classifier.classify("カラメル色素、アルコール、pH調整剤"),
        vec!["カラメル色素", "pH調整剤"]
    );
    // an exempt name used as a group category drops the whole group
    assert_eq!(
        classifier.classify("アルコール(製造用)、増粘剤(キサンタン)"),
        vec!["増粘剤(キサンタン)"]
    );
}

#[test]
fn test_repeated_umbrella_category_replaces_not_merges() {
    let data = ReferenceData::bundled().unwrap();
    let classifier = AdditiveClassifier::new(&data.additives);

    // Only the last 甘味料 group survives
    assert_eq!(
        classifier.classify("甘味料(ステビア)、pH調整剤、甘味料(アスパルテーム、スクラロース)"),
        vec!["甘味料(アスパルテーム、スクラロース)", "pH調整剤"]
    );

    // Empty members are filtered, so an all-empty last group clears the bucket
    // rather than rendering `甘味料(、)`
    assert!(classifier.classify("甘味料(ステビア)、甘味料(、)").is_empty());
}

#[test]
fn test_full_width_group_brackets_render_ascii() {
    let data = ReferenceData::bundled().unwrap();
    let classifier = AdditiveClassifier::new(&data.additives);

    assert_eq!(
        classifier.classify("保存料（ソルビン酸K，安息香酸Na）"),
        vec!["保存料(ソルビン酸K、安息香酸Na)"]
    );
}

#[test]
fn test_priority_then_first_seen_order() {
    let data = ReferenceData::bundled().unwrap();
    let classifier = AdditiveClassifier::new(&data.additives);

    assert_eq!(
        classifier.classify("増粘剤(キサンタン)、pH調整剤、保存料(ソルビン酸K)、増粘剤(キサンタン)、カラメル色素"),
        vec!["カラメル色素", "保存料(ソルビン酸K)", "増粘剤(キサンタン)", "pH調整剤"]
    );
}

#[test]
fn test_empty_additive_text() {
    let data = ReferenceData::bundled().unwrap();
    let classifier = AdditiveClassifier::new(&data.additives);
    assert!(classifier.classify("").is_empty());
}
