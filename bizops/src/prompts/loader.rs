//! Prompt Loader
//!
//! Loads prompt templates from an override directory or falls back to the
//! embedded defaults, and renders them with Handlebars.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

use super::embedded;

/// The prompt templates BizOps knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    /// Chat system instruction
    Copilot,
    /// Analysis system instruction
    Analyst,
    /// Analysis prompt
    Analyze,
    /// Strategy plan prompt
    Strategy,
}

impl Template {
    /// File stem of the template (`<name>.pmt`)
    pub fn name(&self) -> &'static str {
        match self {
            Self::Copilot => "copilot",
            Self::Analyst => "analyst",
            Self::Analyze => "analyze",
            Self::Strategy => "strategy",
        }
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Context for the analysis prompt
#[derive(Debug, Clone, Serialize)]
pub struct DocumentContext<'a> {
    pub document: &'a str,
}

/// Context for the strategy prompt
#[derive(Debug, Clone, Serialize)]
pub struct GoalContext<'a> {
    pub goal: &'a str,
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// Override directory (e.g., `~/.config/bizops/prompts/`)
    user_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader that checks `dir` before the embedded prompts
    ///
    /// A directory that does not exist is ignored.
    pub fn new(dir: Option<&Path>) -> Self {
        debug!(?dir, "PromptLoader::new: called");
        let user_dir = dir.filter(|d| d.is_dir()).map(Path::to_path_buf);
        if let Some(ref d) = user_dir {
            info!("Using prompt overrides from {}", d.display());
        } else {
            debug!("PromptLoader::new: no override directory");
        }

        Self {
            hbs: Self::engine(),
            user_dir,
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            user_dir: None,
        }
    }

    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        // Prompts are plain text; user input must reach the model verbatim.
        hbs.register_escape_fn(handlebars::no_escape);
        hbs.set_strict_mode(true);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. Override: `<dir>/{name}.pmt`
    /// 2. Embedded fallback
    fn load_template(&self, template: Template) -> Result<String> {
        let name = template.name();
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(ref user_dir) = self.user_dir {
            let path = user_dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found in override directory");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt {}: {}", path.display(), e));
            }
            debug!(?path, "PromptLoader::load_template: not in override directory");
        }

        embedded::get_embedded(name)
            .map(str::to_string)
            .ok_or_else(|| eyre!("Prompt template not found: {}", name))
    }

    /// Load a template that takes no variables, such as a system instruction
    pub fn text(&self, template: Template) -> Result<String> {
        debug!(%template, "PromptLoader::text: called");
        Ok(self.load_template(template)?.trim_end().to_string())
    }

    /// Render a template with the given context
    pub fn render<C: Serialize>(&self, template: Template, context: &C) -> Result<String> {
        debug!(%template, "PromptLoader::render: called");
        let source = self.load_template(template)?;
        let rendered = self
            .hbs
            .render_template(&source, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template, e))?;
        Ok(rendered.trim_end().to_string())
    }
}

impl Default for PromptLoader {
    fn default() -> Self {
        Self::embedded_only()
    }
}
