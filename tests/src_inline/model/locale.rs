use super::*;

fn sample() -> LocalizedText {
    LocalizedText {
        default: "Poor metabolizer".to_string(),
        en: None,
        th: Some("ผู้ที่มีการเปลี่ยนแปลงยาช้ามาก".to_string()),
    }
}

#[test]
fn picks_locale_variant_when_present() {
    let text = sample();
    assert_eq!(text.get(Locale::Th), "ผู้ที่มีการเปลี่ยนแปลงยาช้ามาก");
}

#[test]
fn falls_back_to_default_when_variant_missing() {
    let text = sample();
    assert_eq!(text.get(Locale::En), "Poor metabolizer");
}

#[test]
fn empty_variant_falls_back_to_default() {
    let mut text = sample();
    text.th = Some(String::new());
    assert_eq!(text.get(Locale::Th), "Poor metabolizer");
}

#[test]
fn locale_serializes_lowercase() {
    let json = serde_json::to_string(&Locale::Th).expect("json");
    assert_eq!(json, "\"th\"");
    let back: Locale = serde_json::from_str("\"en\"").expect("parse");
    assert_eq!(back, Locale::En);
}
