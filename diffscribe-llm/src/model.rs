//! Supported chat models and their context budgets.

/// A chat model diffscribe knows how to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelKind {
    #[default]
    Gpt35Turbo,
    Gpt4,
}

impl ModelKind {
    /// Wire name sent in the `model` field of a chat completion request.
    pub fn api_name(self) -> &'static str {
        match self {
            ModelKind::Gpt35Turbo => "gpt-3.5-turbo",
            ModelKind::Gpt4 => "gpt-4",
        }
    }

    /// Context-window limit in tokens. Requests above this are rejected by
    /// the API, so every budget decision in the summarizer compares against
    /// this number.
    pub fn max_tokens(self) -> usize {
        match self {
            ModelKind::Gpt35Turbo => 4097,
            ModelKind::Gpt4 => 8192,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_match_the_api() {
        assert_eq!(ModelKind::Gpt35Turbo.api_name(), "gpt-3.5-turbo");
        assert_eq!(ModelKind::Gpt4.api_name(), "gpt-4");
    }

    #[test]
    fn budgets_match_model_limits() {
        assert_eq!(ModelKind::Gpt35Turbo.max_tokens(), 4097);
        assert_eq!(ModelKind::Gpt4.max_tokens(), 8192);
    }
}
