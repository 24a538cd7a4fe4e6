pub mod coerce;
pub mod timestamp;

pub use coerce::{clean_text, extract_decimal, normalize_status};
pub use timestamp::{parse_timestamp, TimestampError};

use serde_json::{Map, Value};

use crate::constants::{
    ITEM, ORDER_ID, PAYMENT_STATUS, PRICE, QUANTITY, REQUIRED_FIELDS, TIMESTAMP, TOTAL,
    ZERO_LITERALS,
};
use crate::domain::{CleanRecord, RawRecord, ValidatedRecord};
use crate::pipeline::processing::{
    Notice, NoticeKind, Rejection, RejectionReason, Stage, StageOutcome,
};
use crate::pipeline::utils::{coerce_to_string, round_to_cents};

/// Turns validated records into clean, canonical records.
///
/// Stateless: the status table and extraction patterns are process-wide
/// statics in [`coerce`] and [`timestamp`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Transformer;

/// A clean record plus anything worth reporting about how it was produced
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedRecord {
    pub record: CleanRecord,
    pub notices: Vec<Notice>,
}

impl Transformer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize every record, dropping the ones whose amounts cannot be read.
    ///
    /// Order is preserved among the survivors. Dropped records become
    /// [`Rejection`]s; corrected totals and unreadable timestamps become
    /// notices.
    pub fn transform(&self, records: &[ValidatedRecord]) -> StageOutcome<CleanRecord> {
        let mut outcome = StageOutcome::new();

        for (index, validated) in records.iter().enumerate() {
            let raw = validated.raw();
            match self.transform_record(raw) {
                Ok(transformed) => {
                    outcome.notices.extend(transformed.notices);
                    outcome.accepted.push(transformed.record);
                }
                Err(reason) => outcome.rejections.push(Rejection {
                    index,
                    order_id: raw.order_id_hint(),
                    stage: Stage::Transform,
                    reason,
                }),
            }
        }

        outcome
    }

    /// Normalize a single record.
    pub fn transform_record(&self, raw: &RawRecord) -> Result<TransformedRecord, RejectionReason> {
        let Some(fields) = raw.as_object() else {
            return Err(RejectionReason::NotAnObject);
        };
        let field = |name: &str| require(fields, name);

        let quantity = read_amount(QUANTITY, field(QUANTITY)?)?;
        let price = read_amount(PRICE, field(PRICE)?)?;

        let payment_status = normalize_status(field(PAYMENT_STATUS)?);
        let item = clean_text(field(ITEM)?);
        let order_id = coerce_to_string(field(ORDER_ID)?).trim().to_string();

        let total = round_to_cents(quantity * price);
        if !total.is_finite() {
            return Err(RejectionReason::OutOfRange {
                field: TOTAL.to_string(),
                value: total.to_string(),
            });
        }

        let mut notices = Vec::new();

        let supplied_total = extract_decimal(field(TOTAL)?);
        if supplied_total != total {
            notices.push(Notice {
                kind: NoticeKind::TotalCorrected,
                order_id: order_id.clone(),
                message: format!(
                    "Correcting total for order_id {}: Original={}, New={}",
                    order_id, supplied_total, total
                ),
            });
        }

        let raw_timestamp = field(TIMESTAMP)?;
        let timestamp = match parse_timestamp(raw_timestamp) {
            Ok(ts) => ts,
            Err(e) => {
                notices.push(Notice {
                    kind: NoticeKind::TimestampUnparsed,
                    order_id: order_id.clone(),
                    message: format!(
                        "Could not parse timestamp '{}' for order_id {}: {:?}",
                        coerce_to_string(raw_timestamp),
                        order_id,
                        e
                    ),
                });
                String::new()
            }
        };

        Ok(TransformedRecord {
            record: CleanRecord {
                order_id,
                timestamp,
                item,
                quantity,
                price,
                payment_status,
                total,
                extra: extra_fields(fields),
            },
            notices,
        })
    }
}

fn require<'a>(fields: &'a Map<String, Value>, name: &str) -> Result<&'a Value, RejectionReason> {
    fields.get(name).ok_or_else(|| RejectionReason::MissingField {
        field: name.to_string(),
    })
}

/// Extract an amount, refusing values that only look like zero because
/// nothing numeric was found in them.
fn read_amount(field: &str, value: &Value) -> Result<f64, RejectionReason> {
    let amount = extract_decimal(value);
    let literal = coerce_to_string(value);

    if amount == 0.0 && !ZERO_LITERALS.contains(&literal.trim()) {
        return Err(RejectionReason::Unparseable {
            field: field.to_string(),
            value: literal,
        });
    }
    if !amount.is_finite() || amount < 0.0 {
        return Err(RejectionReason::OutOfRange {
            field: field.to_string(),
            value: literal,
        });
    }
    Ok(amount)
}

/// Every source field that the transformer does not rewrite
fn extra_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .filter(|(key, _)| !REQUIRED_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
