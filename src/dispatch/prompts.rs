#[cfg(test)]
#[path = "prompts_test.rs"]
mod tests;

use chrono::Local;

use crate::config::constants::QUESTION_CONTEXT_SNIPPET;
use crate::models::{ActionKind, Settings};

pub const DEFAULT_SUMMARIZE: &str = "Please provide a concise summary of the following text. Focus on the main points and key takeaways:\n\n{selectedText}";

pub const DEFAULT_REPLY: &str = "Generate a professional and thoughtful reply to the following message. The reply should be:\n- Friendly and courteous\n- Brief (2-3 sentences)\n- Directly address the main points\n\nMessage:\n{selectedText}";

pub const DEFAULT_COMMENT: &str = "Generate an insightful comment in response to the following text. The comment should:\n- Add value to the discussion\n- Be constructive and respectful\n- Show understanding of the content\n\nContent:\n{selectedText}";

pub const DEFAULT_FACT_CHECK: &str = "Current Date/Time: {currentDate}\n\nYou are a Fact-Checker. Your goal is to verify the accuracy of the following text. \n\nINSTRUCTIONS:\n1. Perform a simulated Google Search for the specific claims in the text.\n2. Verify the information against the most recent data available up to {currentDate}.\n3. Highlight specific inaccuracies or misleading statements.\n4. Provide the correct information with context.\n5. Cite sources if possible.\n\nText to Verify:\n{selectedText}";

/// Looks up the template for a templated action: the user override when
/// one is set, the built-in default otherwise. Fact-check has no
/// override.
pub fn resolve_template(action: ActionKind, settings: &Settings) -> Option<String> {
    let template = match action {
        ActionKind::Summarize => settings
            .prompt_summarize
            .clone()
            .unwrap_or_else(|| DEFAULT_SUMMARIZE.to_string()),
        ActionKind::GenerateReply => settings
            .prompt_reply
            .clone()
            .unwrap_or_else(|| DEFAULT_REPLY.to_string()),
        ActionKind::GenerateComment => settings
            .prompt_comment
            .clone()
            .unwrap_or_else(|| DEFAULT_COMMENT.to_string()),
        ActionKind::FactCheck => DEFAULT_FACT_CHECK.to_string(),
        _ => return None,
    };
    Some(template)
}

/// Substitution is literal and global: every occurrence of the tokens is
/// replaced, no escaping.
pub fn render(template: &str, selected_text: &str) -> String {
    let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    template
        .replace("{selectedText}", selected_text)
        .replace("{currentDate}", &now)
}

/// Composite prompt for the second phase of ask-question.
pub fn question_prompt(selected_text: &str, question: &str) -> String {
    format!(
        "Answer the following question based on the context provided.\n\nContext:\n{}\n\nQuestion:\n{}",
        selected_text, question
    )
}

/// History input text for a submitted question: the question plus a short
/// snippet of the context it was asked about.
pub fn question_input_text(selected_text: &str, question: &str) -> String {
    let snippet: String = selected_text.chars().take(QUESTION_CONTEXT_SNIPPET).collect();
    format!("{}\n\nContext: {}...", question, snippet)
}
