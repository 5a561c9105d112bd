//! Free-Text Analyzer - summaries, action items, and risks for a document

use std::sync::Arc;

use tracing::{debug, error, info};

use super::error::{AnalysisError, FailureCause};
use crate::llm::{Completion, GenerateRequest, LlmClient, Message, ResponseFormat};
use crate::prompts::{DocumentContext, PromptLoader, Template};

/// Result returned when the service answers without any text
pub const EMPTY_ANALYSIS: &str = "No analysis generated.";

/// Produces a markdown-style analysis of pasted business text
pub struct DocumentAnalyzer {
    llm: Arc<dyn LlmClient>,
    prompts: Arc<PromptLoader>,
}

impl DocumentAnalyzer {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>) -> Self {
        debug!(model = %llm.model(), "DocumentAnalyzer::new: called");
        Self { llm, prompts }
    }

    /// Build the analysis request; the document is embedded verbatim
    pub fn build_request(&self, document: &str) -> Result<GenerateRequest, FailureCause> {
        debug!(document_len = %document.len(), "build_request: called");
        let system_instruction = self
            .prompts
            .text(Template::Analyst)
            .map_err(|e| FailureCause::Prompt(e.to_string()))?;
        let prompt = self
            .prompts
            .render(Template::Analyze, &DocumentContext { document })
            .map_err(|e| FailureCause::Prompt(e.to_string()))?;

        // Service default temperature
        Ok(GenerateRequest {
            system_instruction: Some(system_instruction),
            contents: vec![Message::user(prompt)],
            temperature: None,
            response_format: ResponseFormat::Text,
        })
    }

    /// Analyze `document` and return the model's text as-is
    pub async fn analyze_text(&self, document: &str) -> Result<String, AnalysisError> {
        debug!(document_len = %document.len(), "analyze_text: called");
        match self.try_analyze_text(document).await {
            Ok(analysis) => Ok(analysis),
            Err(cause) => {
                error!(kind = %cause.kind(), error = %cause, "analyze_text: analysis failed");
                Err(AnalysisError::from(cause))
            }
        }
    }

    async fn try_analyze_text(&self, document: &str) -> Result<String, FailureCause> {
        let request = self.build_request(document)?;
        let response = self.llm.generate(request).await?;
        debug!(usage = ?response.usage, "try_analyze_text: response received");

        match response.into_completion() {
            Completion::Text(text) => {
                info!(len = %text.len(), "Document analysis complete");
                Ok(text)
            }
            Completion::Empty => {
                info!("Analysis reply carried no text, using fallback");
                Ok(EMPTY_ANALYSIS.to_string())
            }
        }
    }
}
