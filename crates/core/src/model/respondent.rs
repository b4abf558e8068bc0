use serde::{Deserialize, Serialize};

pub const SPECIALIZATION_OPTIONS: &[&str] = &[
    "General Dentist",
    "Oral Radiologist",
    "Oral Surgeon",
    "Orthodontist",
    "Other",
];

pub const YEARS_EXPERIENCE_OPTIONS: &[&str] = &["<5", "5–10", "10–20", ">20"];

pub const WEEKLY_CASES_OPTIONS: &[&str] = &["<10", "10–30", "30–50", ">50"];

/// Optional details about who filled in the form.
///
/// Every field may be empty; none is required for submission. Unlike answers,
/// this describes the respondent and survives navigation between images.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespondentMetadata {
    pub name: String,
    pub clinic: String,
    pub specialization: String,
    pub years_experience: String,
    pub avg_pano_cases_per_week: String,
}

impl RespondentMetadata {
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.fields().iter().all(|value| value.trim().is_empty())
    }

    /// Field values in persisted column order.
    #[must_use]
    pub fn fields(&self) -> [&str; 5] {
        [
            &self.name,
            &self.clinic,
            &self.specialization,
            &self.years_experience,
            &self.avg_pano_cases_per_week,
        ]
    }
}
