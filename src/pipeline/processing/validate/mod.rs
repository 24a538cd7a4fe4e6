pub mod numeric;

pub use numeric::{is_positive_prefixed, is_positive_stripped, NumericPolicy};

use crate::constants::{ITEM, POSITIVE_NUMERIC_FIELDS, REQUIRED_FIELDS};
use crate::domain::{RawRecord, ValidatedRecord};
use crate::pipeline::processing::{Rejection, RejectionReason, Stage, StageOutcome};
use crate::pipeline::utils::coerce_to_string;

/// Configuration for the validator
#[derive(Debug, Clone, Default)]
pub struct ValidatorConfig {
    /// Predicate applied to quantity, price and total
    pub numeric_policy: NumericPolicy,
}

/// Filters raw records down to the ones worth transforming
#[derive(Debug, Clone, Default)]
pub struct Validator {
    pub config: ValidatorConfig,
}

impl Validator {
    /// Create a validator with the default numeric policy
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn with_policy(numeric_policy: NumericPolicy) -> Self {
        Self::with_config(ValidatorConfig { numeric_policy })
    }

    /// Keep the records that carry every required field with usable values.
    ///
    /// Order is preserved. Individual records never make this fail; each
    /// dropped record shows up as a [`Rejection`] instead.
    pub fn validate(&self, records: &[RawRecord]) -> StageOutcome<ValidatedRecord> {
        let mut outcome = StageOutcome::new();

        for (index, record) in records.iter().enumerate() {
            match self.check_record(record) {
                Ok(()) => outcome.accepted.push(ValidatedRecord::new(record.clone())),
                Err(reason) => outcome.rejections.push(Rejection {
                    index,
                    order_id: record.order_id_hint(),
                    stage: Stage::Validate,
                    reason,
                }),
            }
        }

        outcome
    }

    /// Check one record, stopping at the first required field that fails.
    pub fn check_record(&self, record: &RawRecord) -> Result<(), RejectionReason> {
        if !record.is_object() {
            return Err(RejectionReason::NotAnObject);
        }
        for field in REQUIRED_FIELDS {
            self.check_field(record, field)?;
        }
        Ok(())
    }

    fn check_field(&self, record: &RawRecord, field: &str) -> Result<(), RejectionReason> {
        let Some(value) = record.get_present(field) else {
            return Err(RejectionReason::MissingField {
                field: field.to_string(),
            });
        };

        if field == ITEM && coerce_to_string(value).trim().is_empty() {
            return Err(RejectionReason::EmptyItem);
        }

        if POSITIVE_NUMERIC_FIELDS.contains(&field) && !self.config.numeric_policy.is_positive(value) {
            return Err(RejectionReason::NotPositive {
                field: field.to_string(),
                value: coerce_to_string(value),
            });
        }

        Ok(())
    }
}
