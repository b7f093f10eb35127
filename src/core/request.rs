use serde::{Deserialize, Deserializer, Serialize};

/// One execution request as received from a caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    /// Language identifier, validated by the dispatcher. A missing, null or
    /// non-string value reads as the empty id, which no backend matches.
    #[serde(default, deserialize_with = "language_id")]
    pub language: String,
    pub code: String,
    /// Extra input; stdin for most languages, argv for JavaScript
    #[serde(rename = "userInput", default, skip_serializing_if = "Option::is_none")]
    pub user_input: Option<String>,
}

impl ExecutionRequest {
    pub fn new(language: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            code: code.into(),
            user_input: None,
        }
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.user_input = Some(input.into());
        self
    }
}

fn language_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(id)) => id,
        _ => String::new(),
    })
}
