use std::collections::HashSet;

use thiserror::Error;

use crate::model::record::METADATA_COLUMNS;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("duplicate question key: {0}")]
    DuplicateKey(&'static str),
    #[error("question key collides with a record column: {0}")]
    ReservedKey(&'static str),
    #[error("question {0} has no options")]
    NoOptions(&'static str),
    #[error("persisted column order does not cover question {0} exactly once")]
    ColumnOrder(&'static str),
}

/// Sections of the questionnaire, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    ImageQuality,
    DiagnosticReliability,
    Comparative,
    Usability,
    OpenFeedback,
}

impl Section {
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Section::ImageQuality => "Section 2 – Image Quality Assessment",
            Section::DiagnosticReliability => "Section 3 – Diagnostic Reliability",
            Section::Comparative => "Section 4 – Comparative Evaluation",
            Section::Usability => "Section 5 – Usability and Clinical Value",
            Section::OpenFeedback => "Section 6 – Open Feedback",
        }
    }

    #[must_use]
    pub fn hint(self) -> Option<&'static str> {
        match self {
            Section::ImageQuality => Some("Rate 1 (Strongly Disagree) to 5 (Strongly Agree)."),
            _ => None,
        }
    }
}

/// Input shape of a question. Drives both rendering and record flattening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    /// Agreement on the fixed 1–5 scale.
    Likert,
    /// Exactly one label out of `options`.
    SingleChoice(&'static [&'static str]),
    /// Any subset of `options`, stored in option order.
    MultiChoice(&'static [&'static str]),
    FreeText,
}

impl QuestionKind {
    #[must_use]
    pub fn options(self) -> &'static [&'static str] {
        match self {
            QuestionKind::SingleChoice(options) | QuestionKind::MultiChoice(options) => options,
            QuestionKind::Likert | QuestionKind::FreeText => &[],
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            QuestionKind::Likert => "likert",
            QuestionKind::SingleChoice(_) => "single choice",
            QuestionKind::MultiChoice(_) => "multi choice",
            QuestionKind::FreeText => "free text",
        }
    }
}

/// One question descriptor. `key` doubles as the persisted column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub key: &'static str,
    pub section: Section,
    pub prompt: &'static str,
    pub kind: QuestionKind,
}

impl Question {
    #[must_use]
    pub const fn likert(key: &'static str, section: Section, prompt: &'static str) -> Self {
        Self {
            key,
            section,
            prompt,
            kind: QuestionKind::Likert,
        }
    }

    #[must_use]
    pub const fn single(
        key: &'static str,
        section: Section,
        prompt: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self {
            key,
            section,
            prompt,
            kind: QuestionKind::SingleChoice(options),
        }
    }

    #[must_use]
    pub const fn multi(
        key: &'static str,
        section: Section,
        prompt: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self {
            key,
            section,
            prompt,
            kind: QuestionKind::MultiChoice(options),
        }
    }

    #[must_use]
    pub const fn text(key: &'static str, section: Section, prompt: &'static str) -> Self {
        Self {
            key,
            section,
            prompt,
            kind: QuestionKind::FreeText,
        }
    }
}

//
// ─── PANORAMIC QUESTIONNAIRE ──────────────────────────────────────────────────
//

pub const COMPARATIVE_QUALITY_OPTIONS: &[&str] = &[
    "Much Worse",
    "Slightly Worse",
    "Similar",
    "Slightly Better",
    "Much Better",
];

pub const ASPECT_OPTIONS: &[&str] = &[
    "Sharpness",
    "Contrast",
    "Coverage",
    "Consistency",
    "Artifact Reduction",
    "None",
];

pub const YES_NO_OPTIONS: &[&str] = &["Yes", "No"];

use Section::{Comparative, DiagnosticReliability, ImageQuality, OpenFeedback, Usability};

/// The panoramic image evaluation questionnaire.
pub const PANORAMIC_QUESTIONS: &[Question] = &[
    Question::likert(
        "q1_realistic",
        ImageQuality,
        "1. The synthetic panoramic image appears realistic and similar to a true panoramic X-ray.",
    ),
    Question::likert(
        "q2_anatomy_visible",
        ImageQuality,
        "2. The anatomical structures (teeth, jaw, condyles, sinus) are clearly visible.",
    ),
    Question::likert(
        "q3_contrast_brightness",
        ImageQuality,
        "3. The contrast and brightness are clinically adequate.",
    ),
    Question::likert(
        "q4_resolution",
        ImageQuality,
        "4. The image resolution is sufficient for diagnostic purposes.",
    ),
    Question::likert(
        "q5_artifacts",
        ImageQuality,
        "5. There are no major artifacts or distortions that affect interpretation.",
    ),
    Question::likert(
        "q6_landmarks",
        DiagnosticReliability,
        "6. The synthetic image preserves key diagnostic landmarks.",
    ),
    Question::likert(
        "q7_confidence_diagnosis",
        DiagnosticReliability,
        "7. I would feel confident using this image to identify caries, bone levels, or lesions.",
    ),
    Question::likert(
        "q8_treatment_planning",
        DiagnosticReliability,
        "8. The synthetic panoramic provides sufficient information for treatment planning.",
    ),
    Question::likert(
        "q9_symmetry_arch",
        DiagnosticReliability,
        "9. I can easily identify anatomical symmetry and dental arch shape.",
    ),
    Question::likert(
        "q10_alignment",
        DiagnosticReliability,
        "10. The synthetic image aligns spatially with real panoramic anatomy.",
    ),
    Question::single(
        "comparative_quality",
        Comparative,
        "1. Overall quality of the synthetic panoramic compared to a real panoramic image:",
        COMPARATIVE_QUALITY_OPTIONS,
    ),
    Question::multi(
        "aspects_better",
        Comparative,
        "2. Which aspects performed better in the synthetic panoramic? (Select all that apply)",
        ASPECT_OPTIONS,
    ),
    Question::text(
        "aspects_need_improvement",
        Comparative,
        "3. Which aspects need improvement?",
    ),
    Question::likert(
        "q11_reduces_exposures",
        Usability,
        "11. The synthetic panoramic can reduce the need for additional exposures.",
    ),
    Question::likert(
        "q12_workflow_efficient",
        Usability,
        "12. The workflow to generate and view the image is efficient.",
    ),
    Question::likert(
        "q13_integrate_practice",
        Usability,
        "13. I would consider integrating such a system into my daily practice.",
    ),
    Question::likert(
        "q14_beneficial_no_pano",
        Usability,
        "14. The system could be beneficial when panoramic equipment is unavailable.",
    ),
    Question::text(
        "strengths",
        OpenFeedback,
        "1. What are the strengths of the synthetic panoramic images?",
    ),
    Question::text(
        "limitations",
        OpenFeedback,
        "2. What are the limitations or concerns you observed?",
    ),
    Question::text(
        "recommendations",
        OpenFeedback,
        "3. Any recommendations for improvement?",
    ),
    Question::single(
        "willing_future_studies",
        OpenFeedback,
        "4. Would you be willing to participate in future studies or clinical trials of this technology?",
        YES_NO_OPTIONS,
    ),
];

/// Answer column order of the evaluation log. Likert items come first, then
/// the comparative and open-feedback questions, matching existing log files.
pub const PANORAMIC_COLUMNS: &[&str] = &[
    "q1_realistic",
    "q2_anatomy_visible",
    "q3_contrast_brightness",
    "q4_resolution",
    "q5_artifacts",
    "q6_landmarks",
    "q7_confidence_diagnosis",
    "q8_treatment_planning",
    "q9_symmetry_arch",
    "q10_alignment",
    "q11_reduces_exposures",
    "q12_workflow_efficient",
    "q13_integrate_practice",
    "q14_beneficial_no_pano",
    "comparative_quality",
    "aspects_better",
    "aspects_need_improvement",
    "strengths",
    "limitations",
    "recommendations",
    "willing_future_studies",
];

/// Question list that shapes the form, plus the column order of the
/// persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurveySchema {
    questions: &'static [Question],
    columns: &'static [&'static str],
}

impl SurveySchema {
    /// Validate and wrap a question list and its persisted column order.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` for duplicate keys, keys that shadow the fixed
    /// record columns, choice questions without options, or a column order
    /// that is not a permutation of the question keys.
    pub fn new(
        questions: &'static [Question],
        columns: &'static [&'static str],
    ) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        for question in questions {
            if METADATA_COLUMNS.contains(&question.key) {
                return Err(SchemaError::ReservedKey(question.key));
            }
            if !seen.insert(question.key) {
                return Err(SchemaError::DuplicateKey(question.key));
            }
            let needs_options = matches!(
                question.kind,
                QuestionKind::SingleChoice(_) | QuestionKind::MultiChoice(_)
            );
            if needs_options && question.kind.options().is_empty() {
                return Err(SchemaError::NoOptions(question.key));
            }
        }
        for question in questions {
            if columns.iter().filter(|key| **key == question.key).count() != 1 {
                return Err(SchemaError::ColumnOrder(question.key));
            }
        }
        if let Some(extra) = columns.iter().find(|key| !seen.contains(*key)) {
            return Err(SchemaError::ColumnOrder(extra));
        }
        Ok(Self { questions, columns })
    }

    #[must_use]
    pub fn panoramic() -> Self {
        Self {
            questions: PANORAMIC_QUESTIONS,
            columns: PANORAMIC_COLUMNS,
        }
    }

    #[must_use]
    pub fn questions(&self) -> &'static [Question] {
        self.questions
    }

    #[must_use]
    pub fn question(&self, key: &str) -> Option<&'static Question> {
        self.questions.iter().find(|q| q.key == key)
    }

    /// Questions in persisted column order.
    #[must_use]
    pub fn persisted_order(&self) -> Vec<&'static Question> {
        self.columns
            .iter()
            .filter_map(|key| self.question(key))
            .collect()
    }

    /// Questions grouped by section, preserving schema order within each.
    #[must_use]
    pub fn sections(&self) -> Vec<(Section, Vec<&'static Question>)> {
        let mut grouped: Vec<(Section, Vec<&'static Question>)> = Vec::new();
        for question in self.questions {
            match grouped.iter_mut().find(|(section, _)| *section == question.section) {
                Some((_, items)) => items.push(question),
                None => grouped.push((question.section, vec![question])),
            }
        }
        grouped
    }
}

impl Default for SurveySchema {
    fn default() -> Self {
        Self::panoramic()
    }
}
