//! Sub-prompt input classification

use super::registry::{is_exit_token, BACK_TOKEN};

/// One line read at a sub-prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptInput {
    Blank,
    Back,
    Clear,
    Exit,
    Query(String),
}

impl PromptInput {
    pub fn classify(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            Self::Blank
        } else if trimmed.eq_ignore_ascii_case(BACK_TOKEN) {
            Self::Back
        } else if trimmed.eq_ignore_ascii_case("CLEAR") {
            Self::Clear
        } else if is_exit_token(trimmed) {
            Self::Exit
        } else {
            Self::Query(trimmed.to_string())
        }
    }
}

/// Outer prompt for `host`
pub fn main_prompt(host: &str) -> String {
    format!("{}@netdiag:~# ", host)
}

/// Nested prompt: the outer prompt followed by the tool's suffix
pub fn nested_prompt(host: &str, suffix: &str) -> String {
    format!("{}{}", main_prompt(host), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_control_tokens() {
        assert_eq!(PromptInput::classify("   "), PromptInput::Blank);
        assert_eq!(PromptInput::classify("back"), PromptInput::Back);
        assert_eq!(PromptInput::classify(" Clear "), PromptInput::Clear);
        assert_eq!(PromptInput::classify("quit"), PromptInput::Exit);
        assert_eq!(PromptInput::classify("LOGOUT"), PromptInput::Exit);
    }

    #[test]
    fn test_classify_query_is_trimmed() {
        assert_eq!(
            PromptInput::classify("  https://example.com/path \n"),
            PromptInput::Query("https://example.com/path".to_string())
        );
    }

    #[test]
    fn test_prompts() {
        assert_eq!(main_prompt("box"), "box@netdiag:~# ");
        assert_eq!(nested_prompt("box", "give-me-domain# "), "box@netdiag:~# give-me-domain# ");
    }
}
