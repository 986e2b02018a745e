//! Prompts for eligibility assessment

use schemars::schema_for;

use crate::model::{ApplicantProfile, ExtractedVerdict};

/// System prompt for eligibility assessment
pub const ELIGIBILITY_SYSTEM_PROMPT: &str = r#"You are an immigration eligibility analyst.

Your role is to assess whether an applicant profile meets the common bar for
a specific visa route, based only on the profile attributes provided.

You must:
- Weigh every attribute, including the ones marked "not provided"
- Treat missing evidence as uncertainty, not as disqualification
- Be conservative when evidence is weak, borderline, or contradictory
- Name concrete risk factors tied to specific profile attributes

Do not:
- Invent facts the profile does not state
- Give legal advice or cite statutes
- Promise outcomes

Your entire response must be a single JSON object conforming to the
requested schema. No prose before or after it."#;

/// Fixed list of areas the assessor must weigh for every route
const FOCUS_AREAS: &[&str] = &[
    "Financial evidence relative to the route's published threshold",
    "Ties to the home country (employment, property, family)",
    "Immigration history, including prior refusals and overstays",
    "Fit between qualifications/experience and the visa category",
    "Credibility and internal consistency of the stated intent",
];

/// Build the assessment prompt from the applicant profile
///
/// Every profile field appears in the prompt; omitted fields render as
/// "not provided" so the model always sees a complete, comparable
/// attribute set.
pub fn build_assessment_prompt(
    country_label: &str,
    visa_type_label: &str,
    profile: &ApplicantProfile,
) -> String {
    let mut prompt = format!(
        "## Assessment Request\n\nDestination: {}\nVisa route: {}\n\n## Applicant Profile\n\n",
        country_label, visa_type_label
    );

    prompt.push_str(&format!("- Age range: {}\n", field(&profile.age_range)));
    prompt.push_str(&format!(
        "- Relationship status: {}\n",
        field(&profile.relationship_status)
    ));
    prompt.push_str(&format!(
        "- Education level: {}\n",
        field(&profile.education_level)
    ));
    prompt.push_str(&format!(
        "- Work experience: {}\n",
        field(&profile.work_experience)
    ));
    prompt.push_str(&format!(
        "- Language test result: {}\n",
        field(&profile.language_test)
    ));
    prompt.push_str(&format!(
        "- Proof of funds: {}\n",
        field(&profile.proof_of_funds)
    ));
    prompt.push_str(&format!("- Home ties: {}\n", field(&profile.home_ties)));
    prompt.push_str(&format!(
        "- Previous refusals: {}\n",
        field(&profile.previous_refusals)
    ));
    prompt.push_str(&format!(
        "- Travel history: {}\n",
        field(&profile.travel_history)
    ));
    prompt.push_str(&format!(
        "- Sponsor income: {}\n",
        field(&profile.sponsor_income)
    ));
    prompt.push_str(&format!("- Additional notes: {}\n", field(&profile.notes)));

    prompt.push_str("\n## Focus Areas\n\nWeigh each of the following:\n");
    for area in FOCUS_AREAS {
        prompt.push_str(&format!("- {}\n", area));
    }

    prompt.push_str(
        "\n## Output\n\nReturn a single JSON object matching this JSON Schema exactly:\n\n",
    );
    prompt.push_str(&output_schema_json());
    prompt.push('\n');

    prompt
}

/// JSON Schema for the expected output, rendered from the same type the
/// parser validates against
pub fn output_schema_json() -> String {
    let schema = schema_for!(ExtractedVerdict);
    serde_json::to_string_pretty(&schema).unwrap_or_else(|_| String::from("{}"))
}

fn field(value: &Option<String>) -> &str {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("not provided")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_omitted_fields_render_as_not_provided() {
        let profile = ApplicantProfile {
            country: "uk".to_string(),
            visa_type: "uk_skilled_worker".to_string(),
            proof_of_funds: Some("Slightly below minimum".to_string()),
            ..Default::default()
        };

        let prompt = build_assessment_prompt("United Kingdom", "UK Skilled Worker Visa", &profile);

        assert!(prompt.contains("Proof of funds: Slightly below minimum"));
        assert!(prompt.contains("Age range: not provided"));
        assert!(prompt.contains("Travel history: not provided"));

        // The schema block may mention "null"; the profile section must not
        let profile_section = prompt.split("## Focus Areas").next().unwrap();
        assert!(!profile_section.contains("null"));
    }

    #[test]
    fn test_prompt_contains_labels_and_focus_areas() {
        let profile = ApplicantProfile::default();
        let prompt = build_assessment_prompt("Canada", "Canada Express Entry", &profile);

        assert!(prompt.contains("Destination: Canada"));
        assert!(prompt.contains("Visa route: Canada Express Entry"));
        assert!(prompt.contains("prior refusals and overstays"));
    }

    #[test]
    fn test_prompt_embeds_output_schema() {
        let prompt = build_assessment_prompt("Canada", "Canada Express Entry", &Default::default());

        assert!(prompt.contains("risk_factors"));
        assert!(prompt.contains("recommended_documents"));
        assert!(prompt.contains("needs_more_info"));
    }

    #[test]
    fn test_blank_field_counts_as_not_provided() {
        let profile = ApplicantProfile {
            home_ties: Some("   ".to_string()),
            ..Default::default()
        };
        let prompt = build_assessment_prompt("Canada", "Canada Study Permit", &profile);
        assert!(prompt.contains("Home ties: not provided"));
    }
}
