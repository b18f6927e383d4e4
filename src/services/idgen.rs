use sea_orm::{ConnectionTrait, DbBackend, Statement};

use crate::error::{AppError, AppResult};

/// Next booking reference, format "BK" + zero-padded sequence value.
///
/// Values come from a dedicated Postgres sequence read inside the caller's
/// transaction, so concurrent callers can never observe the same number.
/// The unique column constraint on bookings.booking_reference backs this up.
pub async fn next_booking_reference<C: ConnectionTrait>(conn: &C) -> AppResult<String> {
    let value = next_sequence_value(conn, "booking_ref_seq").await?;
    Ok(format_booking_reference(value))
}

/// Next baggage tag, format "BG" + zero-padded sequence value.
pub async fn next_baggage_tag<C: ConnectionTrait>(conn: &C) -> AppResult<String> {
    let value = next_sequence_value(conn, "baggage_tag_seq").await?;
    Ok(format_baggage_tag(value))
}

pub fn format_booking_reference(value: i64) -> String {
    format!("BK{:06}", value)
}

pub fn format_baggage_tag(value: i64) -> String {
    format!("BG{:06}", value)
}

async fn next_sequence_value<C: ConnectionTrait>(conn: &C, sequence: &str) -> AppResult<i64> {
    let stmt = Statement::from_string(
        DbBackend::Postgres,
        format!("SELECT nextval('{}') AS value", sequence),
    );

    let row = conn.query_one(stmt).await?.ok_or_else(|| {
        AppError::Persistence(format!("Sequence {} returned no value", sequence))
    })?;

    let value: i64 = row.try_get("", "value")?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashSet};

    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    use super::*;

    #[test]
    fn test_reference_and_tag_formats() {
        assert_eq!(format_booking_reference(42), "BK000042");
        assert_eq!(format_baggage_tag(1), "BG000001");
        assert_eq!(format_baggage_tag(999999), "BG999999");
        // Values past six digits widen rather than wrap
        assert_eq!(format_baggage_tag(1234567), "BG1234567");
    }

    #[test]
    fn test_distinct_values_give_distinct_tags() {
        let tags: HashSet<String> = (1..=1000).map(format_baggage_tag).collect();
        assert_eq!(tags.len(), 1000);
    }

    #[tokio::test]
    async fn test_next_reference_reads_sequence() {
        let mut row = BTreeMap::new();
        row.insert("value", Value::BigInt(Some(42)));

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row]])
            .into_connection();

        let reference = next_booking_reference(&db).await.unwrap();
        assert_eq!(reference, "BK000042");
    }

    #[tokio::test]
    async fn test_missing_sequence_row_is_persistence_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
            .into_connection();

        let err = next_baggage_tag(&db).await.unwrap_err();
        assert!(matches!(err, AppError::Persistence(_)));
    }
}
