//! Prompt templates for Selg.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    /// Prompts for VSL script analysis extraction.
    pub analysis: AnalysisPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// Prompts for extracting a structured script analysis from a transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisPrompts {
    pub system: String,
    pub user: String,
}

impl Default for AnalysisPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are an expert direct-response copywriter who reverse-engineers VSL (video sales letter) scripts. You analyze transcripts of short persuasion-oriented videos, the kind that runs for roughly thirty seconds to a few minutes and exists to sell one offer.

When analyzing a transcript:
1. Identify the overall persuasion strategy and who the video is talking to
2. Break the script into its functional sections in the order they are spoken
3. Classify each section by the job it does in the sales argument, not by its topic

Section purposes and what they look like:
- hook: the opening seconds that grab attention (a bold claim, a question, a pattern interrupt)
- problem_identification: naming the pain or frustration the viewer already feels
- solution_introduction: presenting the product or method as the way out
- credibility_building: credentials, experience, "I've done this for 10 years"
- social_proof: testimonials, customer counts, named results of others
- objection_handling: preempting "this won't work for me" or "it's too expensive"
- urgency_scarcity: deadlines, limited spots, price going up
- call_to_action: telling the viewer exactly what to do next
- bonus_offer: extras stacked on top of the core offer
- guarantee: refund promises and risk reversal
- summary_recap: restating the offer or argument near the end

Tone is how a section is delivered: urgent, empathetic, authoritative, conversational, persuasive, educational, emotional, logical, testimonial, or reassuring. Pick the single dominant tone per section.

Rate overall effectiveness 1-10 against direct-response fundamentals: a clear hook, a concrete offer, proof, and a single unambiguous call to action."#
                .to_string(),

            user: r#"Analyze this VSL transcript and extract its complete script structure.

Transcript:
{{transcript}}

For the analysis, provide:
- The overall strategy in one or two sentences
- The target audience the script is written for
- The main offer being sold
- Every section in spoken order, each with a short descriptive title, the verbatim-ish content it covers, its purpose, its dominant tone, and the key persuasion points it makes
- Timestamps only if the transcript itself makes section boundaries identifiable; otherwise omit them
- Strengths, concrete improvements, and an overall 1-10 effectiveness rating"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        // Store custom variables
        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            // Load analysis prompts if file exists
            let analysis_path = custom_path.join("analysis.toml");
            if analysis_path.exists() {
                let content = std::fs::read_to_string(&analysis_path)?;
                prompts.analysis = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        // Start with custom variables, then override with provided vars
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(!prompts.analysis.system.is_empty());
        assert!(prompts.analysis.user.contains("{{transcript}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "Analyze {{transcript}} for {{audience}}.";
        let mut vars = std::collections::HashMap::new();
        vars.insert("transcript".to_string(), "Hello world".to_string());
        vars.insert("audience".to_string(), "founders".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Analyze Hello world for founders.");
    }

    #[test]
    fn test_render_with_custom_variables() {
        let mut prompts = Prompts::default();
        prompts
            .variables
            .insert("brand".to_string(), "Acme".to_string());

        let mut vars = std::collections::HashMap::new();
        vars.insert("transcript".to_string(), "Buy now".to_string());

        let result = prompts.render_with_custom("{{brand}}: {{transcript}}", &vars);
        assert_eq!(result, "Acme: Buy now");
    }
}
