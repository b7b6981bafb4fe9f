//! Model value object representing a text-generation model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Text-generation models (Value Object)
///
/// Well-known models get their own variant; anything else is carried
/// verbatim in [`Model::Custom`] so that new provider releases work
/// without a code change.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    // GPT models
    Gpt4,
    Gpt4o,
    Gpt4oMini,
    Gpt41,
    // Claude models
    ClaudeSonnet45,
    ClaudeHaiku45,
    ClaudeOpus45,
    Claude3Sonnet,
    // Custom
    Custom(String),
}

impl Model {
    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gpt4 => "gpt-4",
            Model::Gpt4o => "gpt-4o",
            Model::Gpt4oMini => "gpt-4o-mini",
            Model::Gpt41 => "gpt-4.1",
            Model::ClaudeSonnet45 => "claude-sonnet-4-5",
            Model::ClaudeHaiku45 => "claude-haiku-4-5",
            Model::ClaudeOpus45 => "claude-opus-4-5",
            Model::Claude3Sonnet => "claude-3-sonnet-20240229",
            Model::Custom(s) => s,
        }
    }

    /// Check if this is a Claude model
    ///
    /// Custom names are matched by substring so that dated snapshots
    /// (`claude-3-5-haiku-20241022`) route the same way.
    pub fn is_claude(&self) -> bool {
        match self {
            Model::ClaudeSonnet45
            | Model::ClaudeHaiku45
            | Model::ClaudeOpus45
            | Model::Claude3Sonnet => true,
            Model::Custom(s) => s.to_lowercase().contains("claude"),
            _ => false,
        }
    }

    /// Check if this is a GPT model
    pub fn is_gpt(&self) -> bool {
        match self {
            Model::Gpt4 | Model::Gpt4o | Model::Gpt4oMini | Model::Gpt41 => true,
            Model::Custom(s) => s.to_lowercase().contains("gpt"),
            _ => false,
        }
    }
}

impl Default for Model {
    /// Returns the default model (GPT-4)
    fn default() -> Self {
        Model::Gpt4
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "gpt-4" => Model::Gpt4,
            "gpt-4o" => Model::Gpt4o,
            "gpt-4o-mini" => Model::Gpt4oMini,
            "gpt-4.1" => Model::Gpt41,
            "claude-sonnet-4-5" => Model::ClaudeSonnet45,
            "claude-haiku-4-5" => Model::ClaudeHaiku45,
            "claude-opus-4-5" => Model::ClaudeOpus45,
            "claude-3-sonnet-20240229" => Model::Claude3Sonnet,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(model) => model,
            Err(never) => match never {},
        }
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Model::from(s.as_str()))
    }
}
