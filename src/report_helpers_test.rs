use super::*;

#[test]
fn separator_repeats_the_rule_char() {
    let line = separator(5);
    assert_eq!(line.chars().count(), 5);
    assert!(line.chars().all(|c| c == '\u{2500}'));
}

#[test]
fn separator_zero_width_is_empty() {
    assert!(separator(0).is_empty());
}

#[test]
fn print_json_accepts_any_serializable() {
    #[derive(serde::Serialize)]
    struct Row {
        code: &'static str,
        score: f64,
    }
    print_json_stdout(&Row {
        code: "B11",
        score: 5.0,
    })
    .unwrap();
}
