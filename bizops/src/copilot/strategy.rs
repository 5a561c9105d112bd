//! Structured Plan Requester - schema-constrained strategy plans
//!
//! A plan is produced atomically: the caller gets a fully validated
//! [`StrategyPlan`] or a [`PlanError`], never a partial plan.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::error::{FailureCause, PlanError};
use crate::llm::{Completion, GenerateRequest, LlmClient, Message, ResponseFormat, ResponseSchema, Schema};
use crate::prompts::{GoalContext, PromptLoader, Template};

/// One step of a strategy plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanStep {
    pub phase: String,
    pub action: String,
    pub owner: String,
    pub estimated_impact: String,
}

impl ResponseSchema for PlanStep {
    fn response_schema() -> Schema {
        Schema::object(vec![
            ("phase", Schema::string("e.g., Phase 1: Assessment")),
            ("action", Schema::string("Specific operational action to take")),
            ("owner", Schema::string("Role responsible, e.g., CTO, HR Lead")),
            ("estimatedImpact", Schema::string("Expected outcome of this step")),
        ])
    }
}

/// Structured output of the plan-generation contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyPlan {
    pub title: String,
    pub executive_summary: String,
    pub roi_estimate: String,
    pub steps: Vec<PlanStep>,
}

impl ResponseSchema for StrategyPlan {
    fn response_schema() -> Schema {
        Schema::object(vec![
            ("title", Schema::string("A professional title for the strategy")),
            ("executiveSummary", Schema::string("A high-level summary of the approach")),
            ("roiEstimate", Schema::string("Estimated financial or efficiency return")),
            ("steps", Schema::array(PlanStep::response_schema())),
        ])
    }
}

impl StrategyPlan {
    /// Parse and validate a raw JSON payload
    pub fn from_json(text: &str) -> Result<Self, FailureCause> {
        debug!(len = %text.len(), "StrategyPlan::from_json: called");
        let plan: StrategyPlan = serde_json::from_str(text.trim())?;
        plan.validate()?;
        Ok(plan)
    }

    /// Check that the plan has steps and no blank fields
    pub fn validate(&self) -> Result<(), FailureCause> {
        let blank = |field: &str, value: &str| {
            if value.trim().is_empty() {
                Err(FailureCause::Invalid(format!("{} is blank", field)))
            } else {
                Ok(())
            }
        };

        blank("title", &self.title)?;
        blank("executiveSummary", &self.executive_summary)?;
        blank("roiEstimate", &self.roi_estimate)?;
        if self.steps.is_empty() {
            return Err(FailureCause::Invalid("steps is empty".to_string()));
        }
        for (i, step) in self.steps.iter().enumerate() {
            blank(&format!("steps[{}].phase", i), &step.phase)?;
            blank(&format!("steps[{}].action", i), &step.action)?;
            blank(&format!("steps[{}].owner", i), &step.owner)?;
            blank(&format!("steps[{}].estimatedImpact", i), &step.estimated_impact)?;
        }
        Ok(())
    }
}

/// Generates strategy plans from a single free-text goal
pub struct PlanRequester {
    llm: Arc<dyn LlmClient>,
    prompts: Arc<PromptLoader>,
}

impl PlanRequester {
    /// Lower than chat to favour deterministic, executive-toned output
    pub const TEMPERATURE: f64 = 0.4;

    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>) -> Self {
        debug!(model = %llm.model(), "PlanRequester::new: called");
        Self { llm, prompts }
    }

    /// Build the structured request for `goal`
    pub fn build_request(&self, goal: &str) -> Result<GenerateRequest, FailureCause> {
        debug!(goal_len = %goal.len(), "build_request: called");
        let prompt = self
            .prompts
            .render(Template::Strategy, &GoalContext { goal })
            .map_err(|e| FailureCause::Prompt(e.to_string()))?;

        Ok(GenerateRequest {
            system_instruction: None,
            contents: vec![Message::user(prompt)],
            temperature: Some(Self::TEMPERATURE),
            response_format: ResponseFormat::Json {
                schema: StrategyPlan::response_schema(),
            },
        })
    }

    /// Request a plan for `goal`
    ///
    /// Single attempt; an empty, malformed, or failed response is a [`PlanError`].
    pub async fn generate_plan(&self, goal: &str) -> Result<StrategyPlan, PlanError> {
        debug!(goal_len = %goal.len(), "generate_plan: called");
        match self.try_generate_plan(goal).await {
            Ok(plan) => {
                info!(title = %plan.title, steps = plan.steps.len(), "Generated strategy plan");
                Ok(plan)
            }
            Err(cause) => {
                error!(kind = %cause.kind(), error = %cause, "generate_plan: plan generation failed");
                Err(PlanError::from(cause))
            }
        }
    }

    async fn try_generate_plan(&self, goal: &str) -> Result<StrategyPlan, FailureCause> {
        let request = self.build_request(goal)?;
        let response = self.llm.generate(request).await?;
        debug!(usage = ?response.usage, finish_reason = ?response.finish_reason, "try_generate_plan: response received");

        match response.into_completion() {
            Completion::Text(text) => StrategyPlan::from_json(&text),
            Completion::Empty => Err(FailureCause::Empty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::copilot::FailureKind;
    use crate::llm::client::mock::MockLlmClient;
    use crate::llm::{GenerateResponse, LlmError, SchemaType};

    const APAC_PLAN: &str = r#"{
        "title": "APAC Market Entry",
        "executiveSummary": "Phased entry via Singapore hub.",
        "roiEstimate": "18% revenue uplift within 24 months",
        "steps": [
            {
                "phase": "Phase 1: Assessment",
                "action": "Commission regulatory review for SG, JP, AU",
                "owner": "COO",
                "estimatedImpact": "Go/no-go clarity per market"
            },
            {
                "phase": "Phase 2: Launch",
                "action": "Open Singapore regional office",
                "owner": "VP Expansion",
                "estimatedImpact": "First regional revenue"
            }
        ]
    }"#;

    fn requester(client: Arc<MockLlmClient>) -> PlanRequester {
        PlanRequester::new(client, Arc::new(PromptLoader::embedded_only()))
    }

    #[tokio::test]
    async fn test_generate_plan_success() {
        let client = Arc::new(MockLlmClient::with_texts(&[APAC_PLAN]));
        let plans = requester(client.clone());

        let plan = plans.generate_plan("Expand into APAC").await.unwrap();

        assert_eq!(plan.title, "APAC Market Entry");
        assert_eq!(plan.steps.len(), 2);
        let first = &plan.steps[0];
        assert!(!first.phase.is_empty());
        assert!(!first.action.is_empty());
        assert!(!first.owner.is_empty());
        assert!(!first.estimated_impact.is_empty());

        let request = client.last_request().unwrap();
        assert_eq!(request.temperature, Some(PlanRequester::TEMPERATURE));
        assert!(request.contents[0].text.contains("\"Expand into APAC\""));
        assert!(matches!(request.response_format, ResponseFormat::Json { .. }));
    }

    #[tokio::test]
    async fn test_generate_plan_missing_steps_is_malformed() {
        let body = r#"{"title": "T", "executiveSummary": "S", "roiEstimate": "R"}"#;
        let client = Arc::new(MockLlmClient::with_texts(&[body]));

        let err = requester(client).generate_plan("Cut OpEx").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::MalformedResponse);
        assert_eq!(err.to_string(), "Failed to generate strategic plan.");
        assert!(matches!(err.cause(), FailureCause::Json(_)));
    }

    #[tokio::test]
    async fn test_generate_plan_not_json_is_malformed() {
        let client = Arc::new(MockLlmClient::with_texts(&["Here is your plan: step one..."]));

        let err = requester(client).generate_plan("Cut OpEx").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::MalformedResponse);
    }

    #[tokio::test]
    async fn test_generate_plan_empty_steps_is_malformed() {
        let body = r#"{"title": "T", "executiveSummary": "S", "roiEstimate": "R", "steps": []}"#;
        let client = Arc::new(MockLlmClient::with_texts(&[body]));

        let err = requester(client).generate_plan("Cut OpEx").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::MalformedResponse);
        assert!(matches!(err.cause(), FailureCause::Invalid(m) if m.contains("steps")));
    }

    #[tokio::test]
    async fn test_generate_plan_empty_response() {
        let client = Arc::new(MockLlmClient::new(vec![Ok(GenerateResponse::empty())]));

        let err = requester(client).generate_plan("Cut OpEx").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::EmptyResponse);
    }

    #[tokio::test]
    async fn test_generate_plan_transport_failure_single_attempt() {
        let client = Arc::new(MockLlmClient::new(vec![
            Err(LlmError::ApiError {
                status: 500,
                message: "internal".to_string(),
                reason: None,
            }),
            Ok(GenerateResponse::text(APAC_PLAN)),
        ]));

        let err = requester(client.clone()).generate_plan("Cut OpEx").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::TransportFailure);
        assert_eq!(client.call_count(), 1);
    }

    #[test]
    fn test_validate_rejects_blank_step_field() {
        let mut plan = StrategyPlan::from_json(APAC_PLAN).unwrap();
        plan.steps[1].owner = "  ".to_string();
        let err = plan.validate().unwrap_err();
        assert!(matches!(err, FailureCause::Invalid(m) if m == "steps[1].owner is blank"));
    }

    #[test]
    fn test_schema_matches_wire_contract() {
        let schema = serde_json::to_value(StrategyPlan::response_schema()).unwrap();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(
            schema["required"],
            serde_json::json!(["title", "executiveSummary", "roiEstimate", "steps"])
        );
        assert_eq!(schema["properties"]["steps"]["type"], "ARRAY");
        assert_eq!(
            schema["properties"]["steps"]["items"]["required"],
            serde_json::json!(["phase", "action", "owner", "estimatedImpact"])
        );
        for field in ["title", "executiveSummary", "roiEstimate"] {
            assert_eq!(schema["properties"][field]["type"], "STRING");
        }
    }

    #[test]
    fn test_schema_property_order() {
        let text = serde_json::to_string(&StrategyPlan::response_schema()).unwrap();
        let positions: Vec<usize> = ["\"title\"", "\"executiveSummary\"", "\"roiEstimate\"", "\"steps\""]
            .iter()
            .map(|key| text.find(key).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{text}");
    }

    #[test]
    fn test_schema_required_keys_match_serialized_fields() {
        let plan = StrategyPlan::from_json(APAC_PLAN).unwrap();
        let value = serde_json::to_value(&plan).unwrap();
        let schema = StrategyPlan::response_schema();

        let mut plan_keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        let mut schema_keys = schema.required.clone();
        plan_keys.sort_unstable();
        schema_keys.sort_unstable();
        assert_eq!(plan_keys, schema_keys);

        let step_schema = schema.property("steps").and_then(|s| s.items.as_deref()).unwrap();
        assert_eq!(step_schema.kind, SchemaType::Object);
        let mut step_keys: Vec<&str> = value["steps"][0].as_object().unwrap().keys().map(String::as_str).collect();
        let mut step_schema_keys = step_schema.required.clone();
        step_keys.sort_unstable();
        step_schema_keys.sort_unstable();
        assert_eq!(step_keys, step_schema_keys);
    }
}
