//! Prompt templates and contextual prompt suggestion.
//!
//! Templates use `{{company}}` placeholders and are filled by plain string
//! substitution. Suggestion lookup is pure: industry keywords map to
//! capability-specific example prompts, with a technology-flavored fallback.

use crate::blueprint::CompanyData;
use crate::sandbox::Capability;

/// The slice of a blueprint the sandbox needs for contextualization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessContext {
    pub company: String,
    pub industry: String,
}

impl From<&CompanyData> for BusinessContext {
    fn from(data: &CompanyData) -> Self {
        Self {
            company: data.company.clone(),
            industry: data.industry.clone(),
        }
    }
}

/// Schema-demanding analysis prompt for the blueprint generator.
pub const BLUEPRINT_TEMPLATE: &str = r#"You are an AI transformation analyst. Analyze the company "{{company}}" and reply with a single JSON object, no prose, matching exactly this schema:
{
  "industry": string,
  "summary": string (2-3 sentences on what the company does),
  "businessModel": string (how the company makes money),
  "keyProcesses": [string, ...] (3-5 core business processes),
  "solutions": [
    {"name": string, "type": "agentic" | "vision" | "nlp" | "analytics" | "automation", "description": string, "impact": string}
  ] (exactly 4 entries with distinct types),
  "sandboxPrompts": [string, ...] (4 example prompts a visitor could try against these solutions),
  "diagramDescription": string (a directed flowchart of the company's AI-enabled operations, e.g. "flowchart TD\nA[Customer] --> B[Order Intake]")
}
Return only the JSON object."#;

pub fn blueprint_prompt(company: &str) -> String {
    BLUEPRINT_TEMPLATE.replace("{{company}}", company)
}

fn context_preamble(ctx: Option<&BusinessContext>) -> String {
    match ctx {
        Some(ctx) => format!(
            "Business context: {} operates in the {} industry.\n",
            ctx.company, ctx.industry
        ),
        None => String::new(),
    }
}

pub fn chat_prompt(user: &str, ctx: Option<&BusinessContext>) -> String {
    format!(
        "{}You are a helpful AI business assistant. Answer concisely.\n{}",
        context_preamble(ctx),
        user
    )
}

pub fn workflow_prompt(goal: &str, ctx: Option<&BusinessContext>) -> String {
    format!(
        "{}Act as an autonomous agent. Break the goal below into an ordered execution plan and reply with JSON only: {{\"steps\": [{{\"step\": 1, \"action\": string, \"result\": string or null}}, ...]}}. The array must be in execution order.\nGoal: {}",
        context_preamble(ctx),
        goal
    )
}

pub fn vision_prompt(user: &str, ctx: Option<&BusinessContext>) -> String {
    let focus = if user.trim().is_empty() {
        String::new()
    } else {
        format!("\nFocus: {}", user.trim())
    };
    format!(
        "{}Analyze the attached image. Reply with JSON only: {{\"description\": string, \"objects\": [string, ...], \"insights\": [string, ...]}}.{}",
        context_preamble(ctx),
        focus
    )
}

pub fn document_prompt(content: &str, ctx: Option<&BusinessContext>) -> String {
    format!(
        "{}Extract structured data from the document below. Reply with JSON only: {{\"fields\": {{\"<field name>\": \"<value>\", ...}}, \"confidence\": number between 0 and 100}}.\nDocument:\n{}",
        context_preamble(ctx),
        content
    )
}

pub fn analytics_prompt(content: &str, ctx: Option<&BusinessContext>) -> String {
    format!(
        "{}Analyze the data described below. Reply with JSON only: {{\"insights\": [string, ...], \"trends\": [string, ...], \"forecast\": string, \"recommendation\": string}}.\nData:\n{}",
        context_preamble(ctx),
        content
    )
}

/// Industry keywords recognized by the suggestion lookup.
const INDUSTRY_KEYS: &[&str] = &[
    "retail",
    "healthcare",
    "finance",
    "manufacturing",
    "technology",
];

/// Keyword-match an industry string onto a template set key. Unmatched
/// industries fall back to the technology set.
fn industry_key(industry: &str) -> &'static str {
    let lower = industry.to_lowercase();
    INDUSTRY_KEYS
        .iter()
        .find(|key| lower.contains(**key))
        .copied()
        .unwrap_or("technology")
}

/// Example prompts offered to the user for a capability.
///
/// With a [`BusinessContext`], prompts come from the industry's template set
/// and reference the company by name; without one, a generic set is used.
pub fn suggested_prompts(capability: Capability, ctx: Option<&BusinessContext>) -> Vec<String> {
    match ctx {
        Some(ctx) => industry_templates(industry_key(&ctx.industry), capability)
            .iter()
            .map(|t| t.replace("{{company}}", &ctx.company))
            .collect(),
        None => generic_templates(capability)
            .iter()
            .map(|t| t.to_string())
            .collect(),
    }
}

fn generic_templates(capability: Capability) -> &'static [&'static str] {
    match capability {
        Capability::Chat => &[
            "How can AI help a business like mine?",
            "Draft a friendly reply to a frustrated customer.",
        ],
        Capability::Workflow => &[
            "Plan the steps to automate a weekly reporting process.",
            "Design an agent workflow for onboarding a new employee.",
        ],
        Capability::Vision => &[
            "Upload an image and ask what is in it.",
            "Check this product photo for visible defects.",
        ],
        Capability::Document => &[
            "Paste a contract and extract its key terms.",
            "Extract the line items from an invoice.",
        ],
        Capability::Analytics => &[
            "Describe your sales data and get a forecast.",
            "Find the trends in monthly revenue figures.",
        ],
    }
}

fn industry_templates(key: &str, capability: Capability) -> &'static [&'static str] {
    match (key, capability) {
        ("retail", Capability::Chat) => &[
            "How can {{company}} use AI to personalize the shopping experience?",
            "Draft a customer-service reply for a delayed {{company}} order.",
        ],
        ("retail", Capability::Workflow) => &[
            "Plan the steps for {{company}} to automate order returns end to end.",
            "Design an agent workflow that restocks {{company}} inventory before it runs out.",
        ],
        ("retail", Capability::Vision) => &[
            "Analyze this shelf photo for {{company}} planogram compliance.",
            "Detect low-stock items for {{company}} from this store image.",
        ],
        ("retail", Capability::Document) => &[
            "Extract supplier, items, and totals from this {{company}} purchase order.",
            "Pull the key terms out of this {{company}} vendor contract.",
        ],
        ("retail", Capability::Analytics) => &[
            "Forecast {{company}} sales for the next holiday season.",
            "Which {{company}} product lines show declining demand?",
        ],

        ("healthcare", Capability::Chat) => &[
            "How could {{company}} triage patient questions with an AI assistant?",
            "Explain a routine lab result to a {{company}} patient in plain language.",
        ],
        ("healthcare", Capability::Workflow) => &[
            "Automate {{company}} appointment scheduling and reminders step by step.",
            "Build an agent workflow for {{company}} insurance pre-authorization.",
        ],
        ("healthcare", Capability::Vision) => &[
            "Describe the findings in this scan for {{company}} clinical review.",
            "Check this prescription photo for legibility issues at {{company}}.",
        ],
        ("healthcare", Capability::Document) => &[
            "Extract patient, diagnosis codes, and dates from this {{company}} claim form.",
            "Summarize the key fields of this {{company}} intake form.",
        ],
        ("healthcare", Capability::Analytics) => &[
            "Forecast patient volume for {{company}} clinics next quarter.",
            "Find the trends in {{company}} readmission data.",
        ],

        ("finance", Capability::Chat) => &[
            "How can {{company}} answer customer questions about fees automatically?",
            "Draft a {{company}} response to a disputed transaction.",
        ],
        ("finance", Capability::Workflow) => &[
            "Design the {{company}} loan-approval process as autonomous agent steps.",
            "Automate {{company}} month-end reconciliation end to end.",
        ],
        ("finance", Capability::Vision) => &[
            "Read the amounts and payee from this check image for {{company}}.",
            "Flag anything unusual in this receipt submitted to {{company}}.",
        ],
        ("finance", Capability::Document) => &[
            "Extract the obligations and dates from this {{company}} loan agreement.",
            "Pull the KYC fields from this {{company}} onboarding document.",
        ],
        ("finance", Capability::Analytics) => &[
            "Forecast {{company}} transaction volume for the next quarter.",
            "Which {{company}} customer segments show rising churn risk?",
        ],

        ("manufacturing", Capability::Chat) => &[
            "How can {{company}} cut unplanned downtime with AI?",
            "Summarize today's production incidents for {{company}} leadership.",
        ],
        ("manufacturing", Capability::Workflow) => &[
            "Plan an agent workflow for {{company}} predictive maintenance.",
            "Automate {{company}} supplier ordering when stock falls below par.",
        ],
        ("manufacturing", Capability::Vision) => &[
            "Inspect this part photo for defects on the {{company}} line.",
            "Count the pallets in this {{company}} warehouse image.",
        ],
        ("manufacturing", Capability::Document) => &[
            "Extract part numbers and quantities from this {{company}} bill of materials.",
            "Pull the tolerances from this {{company}} engineering spec.",
        ],
        ("manufacturing", Capability::Analytics) => &[
            "Forecast {{company}} output for the coming quarter.",
            "Where are the bottlenecks in {{company}} production data?",
        ],

        (_, Capability::Chat) => &[
            "How should {{company}} prioritize AI features on its roadmap?",
            "Draft a support reply for a {{company}} user who lost data.",
        ],
        (_, Capability::Workflow) => &[
            "Design an agent workflow that triages {{company}} bug reports.",
            "Automate {{company}} release notes from merged changes.",
        ],
        (_, Capability::Vision) => &[
            "Describe the UI issues visible in this {{company}} screenshot.",
            "Extract the architecture from this {{company}} whiteboard photo.",
        ],
        (_, Capability::Document) => &[
            "Extract action items and owners from this {{company}} meeting doc.",
            "Pull the SLA terms from this {{company}} service agreement.",
        ],
        (_, Capability::Analytics) => &[
            "Forecast {{company}} user growth from recent sign-up data.",
            "Which {{company}} features drive retention?",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(company: &str, industry: &str) -> BusinessContext {
        BusinessContext {
            company: company.to_string(),
            industry: industry.to_string(),
        }
    }

    #[test]
    fn industry_matching_is_keyword_based() {
        assert_eq!(industry_key("Retail & Consumer Goods"), "retail");
        assert_eq!(industry_key("Healthcare Services"), "healthcare");
        assert_eq!(industry_key("finance"), "finance");
        assert_eq!(industry_key("Precision Manufacturing"), "manufacturing");
        assert_eq!(industry_key("Agriculture"), "technology");
    }

    #[test]
    fn contextual_prompts_reference_the_company() {
        let nike = ctx("Nike", "Retail");
        for capability in Capability::ALL {
            let prompts = suggested_prompts(capability, Some(&nike));
            assert!(!prompts.is_empty());
            assert!(
                prompts.iter().all(|p| p.contains("Nike")),
                "{:?} prompts should mention the company",
                capability
            );
            assert!(prompts.iter().all(|p| !p.contains("{{company}}")));
        }
    }

    #[test]
    fn retail_chat_prompts_come_from_the_retail_set() {
        let prompts = suggested_prompts(Capability::Chat, Some(&ctx("Nike", "Retail")));
        assert!(prompts[0].contains("shopping experience"));
    }

    #[test]
    fn unmatched_industry_falls_back_to_technology_set() {
        let prompts = suggested_prompts(Capability::Chat, Some(&ctx("AgriCo", "Agriculture")));
        assert!(prompts[0].contains("roadmap"));
        assert!(prompts[0].contains("AgriCo"));
    }

    #[test]
    fn no_context_uses_the_generic_set() {
        for capability in Capability::ALL {
            let prompts = suggested_prompts(capability, None);
            assert!(!prompts.is_empty());
            assert!(prompts.iter().all(|p| !p.contains("{{company}}")));
        }
    }

    #[test]
    fn blueprint_prompt_substitutes_the_company() {
        let prompt = blueprint_prompt("Acme Corp");
        assert!(prompt.contains("\"Acme Corp\""));
        assert!(prompt.contains("exactly 4 entries"));
        assert!(!prompt.contains("{{company}}"));
    }

    #[test]
    fn structured_capability_prompts_demand_json() {
        let c = ctx("Acme", "Finance");
        assert!(workflow_prompt("close the books", Some(&c)).contains("\"steps\""));
        assert!(vision_prompt("", Some(&c)).contains("\"objects\""));
        assert!(document_prompt("invoice text", None).contains("\"confidence\""));
        assert!(analytics_prompt("monthly sales", None).contains("\"forecast\""));
        let chat = chat_prompt("hello", Some(&c));
        assert!(chat.contains("Acme operates in the Finance industry"));
    }
}
