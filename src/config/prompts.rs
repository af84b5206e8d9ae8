//! Prompt templates for Paddock.

use serde::{Deserialize, Serialize};

/// Collection of all prompt templates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Prompts {
    pub rag: RagPrompts,
}

/// Prompts for answer synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagPrompts {
    pub system: String,
    pub user: String,
}

impl Default for RagPrompts {
    fn default() -> Self {
        Self {
            system: "You are a knowledgeable assistant with expertise in Formula 1 regulations."
                .to_string(),

            user: r#"Based on the following context, answer the question in detail. Provide a comprehensive response, include all relevant points, and elaborate wherever possible.

Context:
{{context}}

Question:
{{question}}"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Render a template, substituting `{{name}}` placeholders.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_render_substitutes_placeholders() {
        let mut vars = HashMap::new();
        vars.insert("context".to_string(), "Article 4.1".to_string());
        vars.insert("question".to_string(), "Minimum weight?".to_string());

        let rendered = Prompts::render(&RagPrompts::default().user, &vars);
        assert!(rendered.contains("Article 4.1"));
        assert!(rendered.contains("Minimum weight?"));
        assert!(!rendered.contains("{{context}}"));
    }
}
