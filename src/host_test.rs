use super::*;

#[test]
fn selection_flag_starts_unsuppressed() {
    assert!(!SelectionFlag::new().is_suppressed());
}

#[test]
fn selection_flag_clones_share_state() {
    let mut writer = SelectionFlag::new();
    let reader = writer.clone();
    writer.suppress();
    assert!(reader.is_suppressed());
    writer.restore();
    assert!(!reader.is_suppressed());
}

#[test]
fn closure_is_a_navigator() {
    let mut seen = Vec::new();
    {
        let mut nav = |t: &TargetId| seen.push(t.clone());
        nav.navigate_to(&TargetId::new("messagerie"));
    }
    assert_eq!(seen, vec![TargetId::from("messagerie")]);
}

#[test]
fn target_id_display_and_serde() {
    let t = TargetId::new("planning");
    assert_eq!(t.to_string(), "planning");
    assert_eq!(t.as_str(), "planning");
    assert_eq!(serde_json::to_value(&t).unwrap(), serde_json::json!("planning"));
}
