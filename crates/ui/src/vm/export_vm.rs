use survey_core::model::{EvaluationRecord, format_timestamp};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportRowVm {
    pub timestamp: String,
    pub image: String,
    pub respondent: String,
    pub answered: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportVm {
    pub location: String,
    pub rows: Vec<ExportRowVm>,
    pub total_questions: usize,
    pub csv: String,
}

impl ExportVm {
    #[must_use]
    pub fn count_label(&self) -> String {
        match self.rows.len() {
            0 => "No evaluations recorded yet.".to_string(),
            1 => "1 evaluation recorded.".to_string(),
            n => format!("{n} evaluations recorded."),
        }
    }
}

fn map_row(record: &EvaluationRecord) -> ExportRowVm {
    let name = record.respondent().name.trim();
    ExportRowVm {
        timestamp: format_timestamp(record.timestamp()),
        image: record.image_filename().to_string(),
        respondent: if name.is_empty() {
            "anonymous".to_string()
        } else {
            name.to_string()
        },
        answered: record
            .answers()
            .iter()
            .filter(|cell| !cell.value.is_empty())
            .count(),
    }
}

/// Newest evaluations first.
#[must_use]
pub fn map_export(records: &[EvaluationRecord], csv: String, location: String) -> ExportVm {
    ExportVm {
        location,
        rows: records.iter().rev().map(map_row).collect(),
        total_questions: records.first().map_or(0, |record| record.answers().len()),
        csv,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_core::model::{AnswerSet, AnswerValue, ImageId, RespondentMetadata, SurveySchema};
    use survey_core::time::fixed_now;

    fn record(image: &str, name: &str, text: Option<&str>) -> EvaluationRecord {
        let schema = SurveySchema::panoramic();
        let mut answers = AnswerSet::new();
        if let Some(text) = text {
            answers
                .set(&schema, "strengths", AnswerValue::Text(text.into()))
                .unwrap();
        }
        let respondent = RespondentMetadata {
            name: name.into(),
            ..RespondentMetadata::default()
        };
        EvaluationRecord::assemble(&schema, fixed_now(), &ImageId::new(image), &respondent, &answers)
    }

    #[test]
    fn rows_are_newest_first_with_answer_counts() {
        let records = vec![record("a.png", "", None), record("b.png", "Ana", Some("clear"))];
        let vm = map_export(&records, String::new(), "evaluations.csv".into());

        assert_eq!(vm.count_label(), "2 evaluations recorded.");
        assert_eq!(vm.total_questions, 21);
        assert_eq!(vm.rows[0].image, "b.png");
        assert_eq!(vm.rows[0].respondent, "Ana");
        assert_eq!(vm.rows[0].answered, 1);
        assert_eq!(vm.rows[1].respondent, "anonymous");
        assert_eq!(vm.rows[1].answered, 0);
    }

    #[test]
    fn empty_log_has_placeholder_label() {
        let vm = map_export(&[], String::new(), "memory".into());
        assert_eq!(vm.count_label(), "No evaluations recorded yet.");
    }
}
