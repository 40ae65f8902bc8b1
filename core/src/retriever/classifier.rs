use regex::Regex;
use std::sync::LazyLock;

// Authoritative keyword list for patient/lab queries. Note that bare analyte
// names (glucose, cholesterol, ...) also match general medical questions that
// lack possessive language; this mirrors the deployed behavior.
static LAB_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(my|report|lab|blood|hemoglobin|glucose|cholesterol|hdl|ldl|creatinine|test|results|value|level|tests)\b",
    )
    .expect("lab keyword pattern is valid")
});

/// Returns `true` if the question looks patient-specific, i.e. it mentions
/// personal lab data rather than general medical knowledge.
///
/// Pure word-boundary matching over the lowercased question; substrings such
/// as "mystery" or "laboratory" never match.
#[must_use]
pub fn is_patient_query(query: &str) -> bool {
    LAB_KEYWORDS.is_match(&query.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn possessive_lab_questions_are_patient_specific() {
        assert!(is_patient_query("What does my report say about anemia?"));
        assert!(is_patient_query("Explain my blood test results"));
        assert!(is_patient_query("Is this creatinine value too high?"));
    }

    #[test]
    fn analyte_names_match_even_without_possessives() {
        // Keyword list includes bare analyte names, so this general question
        // still classifies as patient-specific.
        assert!(is_patient_query("What is a normal glucose level?"));
        assert!(is_patient_query("How does cholesterol affect the heart?"));
    }

    #[test]
    fn keyword_free_questions_are_general() {
        assert!(!is_patient_query("What are the symptoms of influenza?"));
        assert!(!is_patient_query("How is malaria transmitted?"));
    }

    #[test]
    fn matching_respects_word_boundaries() {
        assert!(!is_patient_query("The mystery of the laboratory protests"));
        assert!(!is_patient_query("Myopia is a refractive error"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(is_patient_query("MY HEMOGLOBIN"));
    }
}
