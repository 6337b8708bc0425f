use serde_json::Value;

use crate::bail;
use crate::error::{ErrorKind, EtlResult};
use crate::etl_error;
use crate::types::{RawStatementRecord, StatementRecord};

/// Normalizes one raw upstream record into a [`StatementRecord`].
///
/// - `id` is passed through unchanged and is required: a missing or empty id
///   fails the record rather than producing a null key downstream.
/// - `title` falls back to the id when absent or empty.
/// - `count` is coerced to an integer and defaults to `0` when absent.
pub fn normalize_record(raw: &RawStatementRecord) -> EtlResult<StatementRecord> {
    let Some(id) = raw.id.as_deref().filter(|id| !id.is_empty()) else {
        bail!(
            ErrorKind::InvalidData,
            "Upstream record is missing an id",
            format!("record: {raw:?}")
        );
    };

    let title = match raw.title.as_deref() {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => id.to_string(),
    };

    let count = coerce_count(raw.count.as_ref(), id)?;

    Ok(StatementRecord {
        id: id.to_string(),
        title,
        count,
    })
}

/// Normalizes a full page of raw records, in page order.
///
/// The first failing record aborts the whole batch, so a page is either
/// normalized completely or not at all.
pub fn normalize_batch(content: &[RawStatementRecord]) -> EtlResult<Vec<StatementRecord>> {
    content.iter().map(normalize_record).collect()
}

/// Coerces the raw `count` value into an integer.
///
/// Accepts absent values (as zero), JSON integers, and strings holding an
/// integer. Every other shape is an upstream data contract violation.
fn coerce_count(value: Option<&Value>, id: &str) -> EtlResult<i64> {
    match value {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(number)) => number.as_i64().ok_or_else(|| {
            etl_error!(
                ErrorKind::ConversionError,
                "Statement count is not an integer",
                format!("id: {id}, count: {number}")
            )
        }),
        Some(Value::String(text)) => text.trim().parse::<i64>().map_err(|err| {
            etl_error!(
                ErrorKind::ConversionError,
                "Statement count string is not an integer",
                format!("id: {id}, count: {text:?}"),
                source: err
            )
        }),
        Some(other) => bail!(
            ErrorKind::ConversionError,
            "Statement count has an unsupported JSON type",
            format!("id: {id}, count: {other}")
        ),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw(id: Option<&str>, title: Option<&str>, count: Option<Value>) -> RawStatementRecord {
        RawStatementRecord {
            id: id.map(str::to_string),
            title: title.map(str::to_string),
            count,
        }
    }

    #[test]
    fn missing_title_falls_back_to_id() {
        let record = normalize_record(&raw(Some("P9"), None, Some(json!(4)))).unwrap();
        assert_eq!(
            record,
            StatementRecord {
                id: "P9".to_string(),
                title: "P9".to_string(),
                count: 4,
            }
        );
    }

    #[test]
    fn empty_title_falls_back_to_id() {
        let record = normalize_record(&raw(Some("P1"), Some(""), Some(json!(2)))).unwrap();
        assert_eq!(record.title, "P1");
    }

    #[test]
    fn present_title_is_kept() {
        let record =
            normalize_record(&raw(Some("P1"), Some("A Paper"), Some(json!(2)))).unwrap();
        assert_eq!(record.title, "A Paper");
    }

    #[test]
    fn absent_count_defaults_to_zero() {
        let record = normalize_record(&raw(Some("P1"), Some("t"), None)).unwrap();
        assert_eq!(record.count, 0);

        let record = normalize_record(&raw(Some("P1"), Some("t"), Some(Value::Null))).unwrap();
        assert_eq!(record.count, 0);
    }

    #[test]
    fn string_count_is_coerced() {
        let record = normalize_record(&raw(Some("P1"), Some("t"), Some(json!("17")))).unwrap();
        assert_eq!(record.count, 17);
    }

    #[test]
    fn non_integer_count_is_rejected() {
        for count in [json!("four"), json!(1.5), json!(true), json!([1]), json!({"n": 1})] {
            let err = normalize_record(&raw(Some("P1"), Some("t"), Some(count))).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ConversionError);
        }
    }

    #[test]
    fn missing_id_is_rejected() {
        let err = normalize_record(&raw(None, Some("t"), Some(json!(1)))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);

        let err = normalize_record(&raw(Some(""), Some("t"), Some(json!(1)))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn batch_normalization_aborts_on_first_bad_record() {
        let content = vec![
            raw(Some("P1"), Some("t"), Some(json!(1))),
            raw(Some("P2"), Some("t"), Some(json!("oops"))),
            raw(Some("P3"), Some("t"), Some(json!(3))),
        ];

        let err = normalize_batch(&content).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConversionError);
    }
}
