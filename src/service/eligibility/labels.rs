//! Canonical country and visa-type labels
//!
//! Codes outside the controlled vocabulary fall back to a title-cased
//! transform so new route codes never break the pipeline.

/// Country codes the intake forms currently emit
const COUNTRY_LABELS: &[(&str, &str)] = &[
    ("uk", "United Kingdom"),
    ("gb", "United Kingdom"),
    ("united_kingdom", "United Kingdom"),
    ("us", "United States"),
    ("usa", "United States"),
    ("united_states", "United States"),
    ("ca", "Canada"),
    ("canada", "Canada"),
    ("au", "Australia"),
    ("australia", "Australia"),
    ("nz", "New Zealand"),
    ("new_zealand", "New Zealand"),
    ("ie", "Ireland"),
    ("ireland", "Ireland"),
    ("de", "Germany"),
    ("germany", "Germany"),
    ("nl", "Netherlands"),
    ("netherlands", "Netherlands"),
    ("pt", "Portugal"),
    ("portugal", "Portugal"),
    ("za", "South Africa"),
    ("south_africa", "South Africa"),
    ("ng", "Nigeria"),
    ("nigeria", "Nigeria"),
    ("schengen", "Schengen Area"),
];

/// Visa-type codes the intake forms currently emit
const VISA_TYPE_LABELS: &[(&str, &str)] = &[
    ("uk_skilled_worker", "UK Skilled Worker Visa"),
    ("skilled_worker", "UK Skilled Worker Visa"),
    ("uk_student", "UK Student Visa"),
    ("student", "UK Student Visa"),
    ("uk_visitor", "UK Standard Visitor Visa"),
    ("uk_spouse", "UK Spouse/Partner Visa"),
    ("uk_global_talent", "UK Global Talent Visa"),
    ("us_b1_b2", "US B1/B2 Visitor Visa"),
    ("b1_b2", "US B1/B2 Visitor Visa"),
    ("us_f1", "US F-1 Student Visa"),
    ("us_h1b", "US H-1B Specialty Occupation Visa"),
    ("ca_express_entry", "Canada Express Entry"),
    ("express_entry", "Canada Express Entry"),
    ("ca_study_permit", "Canada Study Permit"),
    ("study_permit", "Canada Study Permit"),
    ("ca_visitor", "Canada Visitor Visa"),
    ("au_student", "Australia Student Visa (Subclass 500)"),
    ("au_skilled_independent", "Australia Skilled Independent Visa (Subclass 189)"),
    ("schengen_tourist", "Schengen Tourist Visa"),
];

/// Resolve a country code to its display label
pub fn country_label(code: &str) -> String {
    resolve(COUNTRY_LABELS, code)
}

/// Resolve a visa-type code to its display label
pub fn visa_type_label(code: &str) -> String {
    resolve(VISA_TYPE_LABELS, code)
}

fn resolve(table: &[(&str, &str)], code: &str) -> String {
    let normalized = code.trim().to_lowercase();
    table
        .iter()
        .find(|(key, _)| *key == normalized)
        .map(|(_, label)| (*label).to_string())
        .unwrap_or_else(|| title_case(&normalized))
}

/// Generic fallback: underscores and hyphens become spaces, words are
/// title-cased, e.g. `some_new_route` -> `Some New Route`
fn title_case(code: &str) -> String {
    code.split(['_', '-', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_country_codes() {
        assert_eq!(country_label("uk"), "United Kingdom");
        assert_eq!(country_label("GB"), "United Kingdom");
        assert_eq!(country_label(" za "), "South Africa");
    }

    #[test]
    fn test_known_visa_types() {
        assert_eq!(visa_type_label("uk_skilled_worker"), "UK Skilled Worker Visa");
        assert_eq!(visa_type_label("ca_express_entry"), "Canada Express Entry");
    }

    #[test]
    fn test_unknown_code_title_cases() {
        assert_eq!(visa_type_label("some_new_route"), "Some New Route");
        assert_eq!(country_label("freedonia"), "Freedonia");
        assert_eq!(visa_type_label("multi-part_code"), "Multi Part Code");
    }
}
