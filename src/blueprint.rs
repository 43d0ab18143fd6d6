//! Blueprint generation: one backend call turns a company name into a
//! structured [`CompanyData`] record, with a deterministic placeholder
//! standing in whenever the backend or its reply lets us down.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::{BackendPrompt, GenerativeBackend};
use crate::config::SOLUTION_COUNT;
use crate::deserializers::parse_embedded;
use crate::error::{BlueprintError, Result};
use crate::prompts;
use crate::state::BlueprintWriter;

/// Capability tag on a [`Solution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolutionKind {
    Agentic,
    Vision,
    Nlp,
    Analytics,
    Automation,
}

/// One named AI use-case inside a blueprint. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SolutionKind,
    pub description: String,
    #[serde(default)]
    pub impact: String,
}

/// Whether a blueprint came from the backend or from the local placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlueprintSource {
    Generated,
    Placeholder,
}

/// The structured business analysis for one company. Replaced wholesale on
/// each new query; never partially mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyData {
    pub company: String,
    pub industry: String,
    pub summary: String,
    pub business_model: String,
    pub key_processes: Vec<String>,
    pub solutions: Vec<Solution>,
    pub sandbox_prompts: Vec<String>,
    pub diagram_description: String,
    pub source: BlueprintSource,
    pub generated_at: DateTime<Utc>,
}

/// Reply-side shape of the blueprint schema; provenance fields are attached
/// after validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBlueprint {
    industry: String,
    summary: String,
    business_model: String,
    #[serde(default)]
    key_processes: Vec<String>,
    solutions: Vec<Solution>,
    #[serde(default)]
    sandbox_prompts: Vec<String>,
    diagram_description: String,
}

impl RawBlueprint {
    fn into_company_data(self, company: &str) -> Result<CompanyData> {
        if self.industry.trim().is_empty()
            || self.summary.trim().is_empty()
            || self.diagram_description.trim().is_empty()
        {
            return Err(BlueprintError::Validation {
                message: "blueprint reply is missing required fields".to_string(),
            });
        }
        if self.solutions.len() != SOLUTION_COUNT {
            return Err(BlueprintError::Validation {
                message: format!(
                    "blueprint reply has {} solutions, schema demands {}",
                    self.solutions.len(),
                    SOLUTION_COUNT
                ),
            });
        }
        if self
            .solutions
            .iter()
            .any(|s| s.name.trim().is_empty() || s.description.trim().is_empty())
        {
            return Err(BlueprintError::Validation {
                message: "blueprint reply contains an unnamed or undescribed solution".to_string(),
            });
        }

        Ok(CompanyData {
            company: company.to_string(),
            industry: self.industry,
            summary: self.summary,
            business_model: self.business_model,
            key_processes: self.key_processes,
            solutions: self.solutions,
            sandbox_prompts: self.sandbox_prompts,
            diagram_description: self.diagram_description,
            source: BlueprintSource::Generated,
            generated_at: Utc::now(),
        })
    }
}

/// Parse a backend reply into validated [`CompanyData`].
fn parse_blueprint(company: &str, reply: &str) -> Result<CompanyData> {
    let raw: RawBlueprint = parse_embedded(reply)?;
    raw.into_company_data(company)
}

/// Deterministic stand-in served when generation fails in any way, so the
/// caller never sees a broken or half-filled record.
pub fn placeholder_blueprint(company: &str) -> CompanyData {
    CompanyData {
        company: company.to_string(),
        industry: "Technology".to_string(),
        summary: format!(
            "{} is a forward-looking business with significant opportunities to apply AI across its operations.",
            company
        ),
        business_model: "Delivers products and services to its customers through digital and traditional channels.".to_string(),
        key_processes: vec![
            "Customer engagement".to_string(),
            "Operations management".to_string(),
            "Data analysis".to_string(),
            "Service delivery".to_string(),
        ],
        solutions: vec![
            Solution {
                name: "Operations Copilot".to_string(),
                kind: SolutionKind::Agentic,
                description: format!(
                    "An autonomous assistant that plans and executes routine {} workflows end to end.",
                    company
                ),
                impact: "Frees teams from repetitive coordination work".to_string(),
            },
            Solution {
                name: "Customer Conversation Assistant".to_string(),
                kind: SolutionKind::Nlp,
                description: "Answers customer questions in natural language, around the clock.".to_string(),
                impact: "Faster responses and lower support load".to_string(),
            },
            Solution {
                name: "Demand Insights".to_string(),
                kind: SolutionKind::Analytics,
                description: "Finds trends in operational data and forecasts what comes next.".to_string(),
                impact: "Decisions backed by data instead of gut feel".to_string(),
            },
            Solution {
                name: "Document Processing".to_string(),
                kind: SolutionKind::Automation,
                description: "Extracts structured fields from invoices, contracts, and forms automatically.".to_string(),
                impact: "Minutes of manual entry become seconds".to_string(),
            },
        ],
        sandbox_prompts: vec![
            format!("How can {} get started with AI?", company),
            format!("Plan the steps to automate a weekly {} report.", company),
            format!("Extract the key terms from a {} contract.", company),
            format!("Forecast demand for {} next quarter.", company),
        ],
        diagram_description: format!(
            "flowchart TD\n    A[{}] --> B[AI Adoption]\n    B --> C[Automated Workflows]\n    B --> D[Customer Assistant]\n    B --> E[Data Insights]",
            company
        ),
        source: BlueprintSource::Placeholder,
        generated_at: Utc::now(),
    }
}

/// Turns a company name into a [`CompanyData`] record via one backend call.
pub struct BlueprintGenerator<B> {
    backend: B,
}

impl<B: GenerativeBackend> BlueprintGenerator<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Generate a blueprint for `company`.
    ///
    /// Empty or whitespace-only input is rejected before any backend call.
    /// Every other failure (network, status, timeout, parse, validation) is
    /// absorbed into the placeholder; this method never surfaces those.
    pub async fn generate(&self, company: &str) -> Result<CompanyData> {
        let name = company.trim();
        if name.is_empty() {
            return Err(BlueprintError::Validation {
                message: "company name must not be empty".to_string(),
            });
        }
        Ok(self.run(name).await)
    }

    /// Generate and publish into the application store: raises the
    /// generating flag, writes the result wholesale, clears the flag.
    ///
    /// On empty input the store is untouched and the generating flag is
    /// never raised.
    pub async fn generate_into(
        &self,
        writer: &BlueprintWriter,
        company: &str,
    ) -> Result<CompanyData> {
        let name = company.trim();
        if name.is_empty() {
            return Err(BlueprintError::Validation {
                message: "company name must not be empty".to_string(),
            });
        }

        writer.set_generating(true);
        let data = self.run(name).await;
        writer.set_company(data.clone());
        writer.set_generating(false);
        Ok(data)
    }

    async fn run(&self, name: &str) -> CompanyData {
        match self.request(name).await {
            Ok(data) => data,
            Err(err) => {
                tracing::warn!(
                    "blueprint generation for {} failed ({}); serving placeholder",
                    name,
                    err
                );
                placeholder_blueprint(name)
            }
        }
    }

    async fn request(&self, name: &str) -> Result<CompanyData> {
        let prompt = BackendPrompt::text(prompts::blueprint_prompt(name));
        let reply = self.backend.complete(&prompt).await?;
        tracing::debug!("blueprint reply: {} chars", reply.text.len());
        parse_blueprint(name, &reply.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_reply() -> String {
        serde_json::json!({
            "industry": "Retail",
            "summary": "Sells shoes.",
            "businessModel": "Direct to consumer.",
            "keyProcesses": ["Design", "Logistics"],
            "solutions": [
                {"name": "A", "type": "agentic", "description": "plans", "impact": "x"},
                {"name": "B", "type": "vision", "description": "sees", "impact": "y"},
                {"name": "C", "type": "nlp", "description": "chats", "impact": "z"},
                {"name": "D", "type": "analytics", "description": "counts", "impact": "w"},
            ],
            "sandboxPrompts": ["try me"],
            "diagramDescription": "flowchart TD\nA-->B",
        })
        .to_string()
    }

    #[test]
    fn parses_a_valid_reply() {
        let data = parse_blueprint("Nike", &valid_reply()).unwrap();
        assert_eq!(data.company, "Nike");
        assert_eq!(data.industry, "Retail");
        assert_eq!(data.solutions.len(), SOLUTION_COUNT);
        assert_eq!(data.source, BlueprintSource::Generated);
        assert_eq!(data.solutions[1].kind, SolutionKind::Vision);
    }

    #[test]
    fn parses_a_reply_wrapped_in_prose() {
        let reply = format!("Here is the analysis:\n```json\n{}\n```", valid_reply());
        let data = parse_blueprint("Nike", &reply).unwrap();
        assert_eq!(data.industry, "Retail");
    }

    #[test]
    fn wrong_solution_count_is_rejected() {
        let mut v: serde_json::Value = serde_json::from_str(&valid_reply()).unwrap();
        v["solutions"].as_array_mut().unwrap().pop();
        let err = parse_blueprint("Nike", &v.to_string()).unwrap_err();
        assert!(matches!(err, BlueprintError::Validation { .. }));
    }

    #[test]
    fn missing_fields_are_rejected() {
        let mut v: serde_json::Value = serde_json::from_str(&valid_reply()).unwrap();
        v["summary"] = serde_json::json!("   ");
        assert!(parse_blueprint("Nike", &v.to_string()).is_err());

        let mut v: serde_json::Value = serde_json::from_str(&valid_reply()).unwrap();
        v["diagramDescription"] = serde_json::json!("");
        assert!(parse_blueprint("Nike", &v.to_string()).is_err());
    }

    #[test]
    fn unknown_solution_type_is_a_parse_error() {
        let reply = valid_reply().replace("\"vision\"", "\"telepathy\"");
        assert!(parse_blueprint("Nike", &reply).is_err());
    }

    #[test]
    fn placeholder_is_complete_and_deterministic() {
        let a = placeholder_blueprint("Acme");
        let b = placeholder_blueprint("Acme");
        assert_eq!(a.solutions.len(), SOLUTION_COUNT);
        assert_eq!(a.source, BlueprintSource::Placeholder);
        assert_eq!(a.solutions, b.solutions);
        assert!(a.summary.contains("Acme"));
        assert!(a.diagram_description.starts_with("flowchart TD"));
        let kinds: std::collections::HashSet<_> =
            a.solutions.iter().map(|s| s.kind).collect();
        assert_eq!(kinds.len(), SOLUTION_COUNT, "placeholder kinds are distinct");
    }
}
