use super::*;

#[test]
fn test_render_replaces_all_occurrences() {
    let template = "a {selectedText} b {selectedText} c {selectedText}";
    let rendered = render(template, "X");

    assert_eq!(rendered, "a X b X c X");
    assert!(!rendered.contains("{selectedText}"));
}

#[test]
fn test_render_is_literal() {
    // No escaping: braces in the input land verbatim.
    let rendered = render("{selectedText}", "fn main() { println!(\"{x}\"); }");
    assert_eq!(rendered, "fn main() { println!(\"{x}\"); }");
}

#[test]
fn test_render_injects_current_date() {
    let rendered = render(DEFAULT_FACT_CHECK, "The moon is made of cheese.");

    assert!(!rendered.contains("{currentDate}"));
    assert!(!rendered.contains("{selectedText}"));
    assert!(rendered.contains("The moon is made of cheese."));

    // The injected value is a real timestamp.
    let date = rendered
        .lines()
        .next()
        .unwrap()
        .strip_prefix("Current Date/Time: ")
        .unwrap();
    chrono::NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S")
        .expect("injected date should parse");
}

#[test]
fn test_resolve_template_defaults() {
    let settings = Settings::default();

    assert_eq!(
        resolve_template(ActionKind::Summarize, &settings).as_deref(),
        Some(DEFAULT_SUMMARIZE)
    );
    assert_eq!(
        resolve_template(ActionKind::GenerateReply, &settings).as_deref(),
        Some(DEFAULT_REPLY)
    );
    assert_eq!(
        resolve_template(ActionKind::GenerateComment, &settings).as_deref(),
        Some(DEFAULT_COMMENT)
    );
    assert_eq!(
        resolve_template(ActionKind::FactCheck, &settings).as_deref(),
        Some(DEFAULT_FACT_CHECK)
    );
    assert_eq!(resolve_template(ActionKind::Shorter, &settings), None);
}

#[test]
fn test_resolve_template_user_override() {
    let settings = Settings {
        prompt_summarize: Some("TLDR: {selectedText}".to_string()),
        ..Settings::default()
    };

    assert_eq!(
        resolve_template(ActionKind::Summarize, &settings).as_deref(),
        Some("TLDR: {selectedText}")
    );
    // Fact-check never uses an override.
    assert_eq!(
        resolve_template(ActionKind::FactCheck, &settings).as_deref(),
        Some(DEFAULT_FACT_CHECK)
    );
}

#[test]
fn test_question_prompt_embeds_context_and_question() {
    let prompt = question_prompt("some context", "what is this?");
    assert!(prompt.contains("Context:\nsome context"));
    assert!(prompt.contains("Question:\nwhat is this?"));
}

#[test]
fn test_question_input_text_snippets_context() {
    let context = "c".repeat(250);
    let input = question_input_text(&context, "why?");

    assert!(input.starts_with("why?"));
    assert!(input.contains(&"c".repeat(QUESTION_CONTEXT_SNIPPET)));
    assert!(!input.contains(&"c".repeat(QUESTION_CONTEXT_SNIPPET + 1)));
    assert!(input.ends_with("..."));
}
