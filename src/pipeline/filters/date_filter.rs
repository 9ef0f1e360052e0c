use chrono::NaiveDate;
use serde::Deserialize;

use crate::data_model::{ExclusionReason, Record};
use crate::error::{PipelineError, Result};
use crate::executor::{ProcessingStep, Stage};
use crate::pipeline::dates::{parse_date, DateFormat, DateParseError};

/// What to do with a record when its date cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureAction {
    Keep,
    Drop,
}

/// Per-variant handling of empty and unparseable dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DatePolicy {
    pub on_missing: FailureAction,
    pub on_unparseable: FailureAction,
}

/// Drops records dated strictly before `cutoff`.
pub struct DateCutoffFilter {
    field: String,
    formats: Vec<DateFormat>,
    cutoff: NaiveDate,
    policy: DatePolicy,
}

impl DateCutoffFilter {
    pub fn new(
        field: impl Into<String>,
        formats: Vec<DateFormat>,
        cutoff: NaiveDate,
        policy: DatePolicy,
    ) -> Self {
        DateCutoffFilter {
            field: field.into(),
            formats,
            cutoff,
            policy,
        }
    }
}

impl ProcessingStep for DateCutoffFilter {
    fn name(&self) -> &'static str {
        "DateCutoffFilter"
    }

    fn stage(&self) -> Stage {
        Stage::Date
    }

    fn process(&self, record: Record) -> Result<Record> {
        let raw = record.get_trimmed(&self.field);
        match parse_date(raw, &self.formats) {
            Ok(date) if date < self.cutoff => {
                let detail = format!("{} is before {}", date, self.cutoff);
                Err(PipelineError::filtered(record, ExclusionReason::Date, detail))
            }
            Ok(_) => Ok(record),
            Err(e) => {
                let action = match e {
                    DateParseError::Empty => self.policy.on_missing,
                    DateParseError::NoMatchingFormat(_) => self.policy.on_unparseable,
                };
                match action {
                    FailureAction::Keep => Ok(record),
                    FailureAction::Drop => {
                        let detail = format!("'{}': {}", self.field, e);
                        Err(PipelineError::filtered(record, ExclusionReason::Date, detail))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(policy: DatePolicy) -> DateCutoffFilter {
        DateCutoffFilter::new(
            "first_date_parsed",
            vec!["%d/%m/%Y".into(), "%Y-%m-%d".into(), "%d-%m-%Y".into()],
            NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
            policy,
        )
    }

    fn record(date: &str) -> Record {
        [("first_date_parsed", date)].into_iter().collect()
    }

    fn is_date_rejection(result: &Result<Record>) -> bool {
        matches!(
            result,
            Err(PipelineError::RecordFiltered {
                reason: ExclusionReason::Date,
                ..
            })
        )
    }

    const KEEP_MISSING_DROP_BAD: DatePolicy = DatePolicy {
        on_missing: FailureAction::Keep,
        on_unparseable: FailureAction::Drop,
    };

    #[test]
    fn test_cutoff_is_strictly_before() {
        let f = filter(KEEP_MISSING_DROP_BAD);
        assert!(is_date_rejection(&f.process(record("2018-12-31"))));
        assert!(f.process(record("2019-01-01")).is_ok());
        assert!(f.process(record("15/03/2020")).is_ok());
        assert!(is_date_rejection(&f.process(record("31-12-2018"))));
    }

    #[test]
    fn test_policy_controls_missing_and_unparseable_dates() {
        let f = filter(KEEP_MISSING_DROP_BAD);
        assert!(f.process(record("")).is_ok());
        assert!(f.process(Record::new()).is_ok());
        assert!(is_date_rejection(&f.process(record("not a date"))));
        assert!(is_date_rejection(&f.process(record("32/01/2020"))));

        let lenient = filter(DatePolicy {
            on_missing: FailureAction::Keep,
            on_unparseable: FailureAction::Keep,
        });
        assert!(lenient.process(record("not a date")).is_ok());

        let strict = filter(DatePolicy {
            on_missing: FailureAction::Drop,
            on_unparseable: FailureAction::Drop,
        });
        assert!(is_date_rejection(&strict.process(record(""))));
    }
}
