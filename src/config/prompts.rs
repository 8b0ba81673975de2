//! Assistant primer and persona files
//!
//! The primer is the fixed first transcript entry. A persona file can
//! replace the built-in one.
//!
//! # Example Persona File
//!
//! ```toml
//! [persona]
//! name = "Skincare Advisor"
//! description = "Builds routines from selected products"
//!
//! [system_prompt]
//! content = """
//! You are a helpful skincare and beauty advisor...
//! """
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// A persona/prompt template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Persona metadata
    pub persona: PersonaInfo,

    /// The system prompt
    pub system_prompt: SystemPrompt,
}

/// Persona metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaInfo {
    /// Display name of the persona
    pub name: String,

    /// Brief description
    #[serde(default)]
    pub description: String,
}

/// System prompt content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemPrompt {
    pub content: String,
}

impl PromptTemplate {
    /// Load a template from a TOML file
    pub async fn load_from_file(path: &Path) -> Result<Self, PromptError> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| PromptError::IoError(e.to_string()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, PromptError> {
        let template: PromptTemplate =
            toml::from_str(content).map_err(|e| PromptError::ParseError(e.to_string()))?;

        if template.system_prompt.content.trim().is_empty() {
            return Err(PromptError::ParseError("system_prompt.content is empty".to_string()));
        }
        Ok(template)
    }
}

/// Resolve the primer: persona file if given, built-in advisor otherwise
pub async fn load_primer(persona_file: Option<&Path>) -> Result<String, PromptError> {
    match persona_file {
        Some(path) => {
            let template = PromptTemplate::load_from_file(path).await?;
            tracing::info!("Using persona '{}' from {}", template.persona.name, path.display());
            Ok(template.system_prompt.content.trim().to_string())
        }
        None => Ok(builtin::ROUTINE_ADVISOR.to_string()),
    }
}

/// Errors from prompt loading
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Built-in prompts that don't require files
pub mod builtin {
    /// Beauty advisor primer used for routine generation and follow-ups
    pub const ROUTINE_ADVISOR: &str = "You are a helpful skincare and beauty advisor. Limit responses to 200 words or less. Using the products/details sent to you, build a sensible routine using said products. Only answer questions about the generated routine, skincare, haircare, makeup, fragrance, or related topics. If asked about anything else, politely say you can only answer beauty-related questions. Don't attempt to display images, and only include the routine and details about products that are relevant to the routine. Limit attempts at formatting.";
}
