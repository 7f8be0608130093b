//! Multi-row INSERT rendering for MySQL.

use crate::error::MySQLPopulatorError;
use bulk_pipeline::InsertStatement;
use mysql_async::Value;
use record_generator::FieldValue;

/// Maximum number of `?` placeholders in one MySQL prepared statement.
pub const MAX_PLACEHOLDERS: usize = 65_535;

/// Reject a batch size whose full batches could never be inserted.
///
/// Checked before any record is generated; `render_insert` enforces the
/// same limit per statement.
pub fn check_batch_size(
    table: &'static str,
    columns: usize,
    batch_size: usize,
) -> Result<(), MySQLPopulatorError> {
    let count = batch_size.saturating_mul(columns);
    if count > MAX_PLACEHOLDERS {
        return Err(MySQLPopulatorError::TooManyPlaceholders {
            table,
            count,
            max: MAX_PLACEHOLDERS,
        });
    }
    Ok(())
}

/// Render `statement` as MySQL SQL plus its positional parameters.
///
/// ```text
/// INSERT INTO `t` (`a`, `b`) VALUES (?, ?), (?, ?)
/// ```
pub fn render_insert(
    statement: &InsertStatement,
) -> Result<(String, Vec<Value>), MySQLPopulatorError> {
    if statement.params.len() > MAX_PLACEHOLDERS {
        return Err(MySQLPopulatorError::TooManyPlaceholders {
            table: statement.table,
            count: statement.params.len(),
            max: MAX_PLACEHOLDERS,
        });
    }

    let col_placeholders: Vec<&str> = statement.columns.iter().map(|_| "?").collect();
    let row_template = format!("({})", col_placeholders.join(", "));
    let rows_template: Vec<&str> = (0..statement.row_count)
        .map(|_| row_template.as_str())
        .collect();

    let sql = format!(
        "INSERT INTO `{}` ({}) VALUES {}",
        statement.table,
        statement
            .columns
            .iter()
            .map(|c| format!("`{c}`"))
            .collect::<Vec<_>>()
            .join(", "),
        rows_template.join(", ")
    );

    let params = statement.params.iter().map(to_mysql_value).collect();
    Ok((sql, params))
}

/// Convert a generated field into a MySQL parameter.
pub fn to_mysql_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Int(i) => Value::Int(*i),
        FieldValue::Text(s) => Value::Bytes(s.as_bytes().to_vec()),
        FieldValue::Null => Value::NULL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulk_pipeline::Batch;
    use record_generator::{PanelOrderItem, Record};

    fn item(a: i64, b: i64, c: i64) -> PanelOrderItem {
        PanelOrderItem {
            panel_order_id: a,
            question_id: b,
            order_index: c,
        }
    }

    #[test]
    fn test_render_multi_row_insert() {
        let batch = Batch::from(vec![item(1, 1, 1), item(2, 2, 2)]);
        let stmt = InsertStatement::for_batch(&batch).unwrap();

        let (sql, params) = render_insert(&stmt).unwrap();

        assert_eq!(
            sql,
            "INSERT INTO `panel_order_items` (`panel_order_id`, `question_id`, `order_index`) \
             VALUES (?, ?, ?), (?, ?, ?)"
        );
        assert_eq!(
            params,
            vec![
                Value::Int(1),
                Value::Int(1),
                Value::Int(1),
                Value::Int(2),
                Value::Int(2),
                Value::Int(2),
            ]
        );
    }

    #[test]
    fn test_single_row_insert() {
        let batch = Batch::from(vec![item(7, 8, 9)]);
        let stmt = InsertStatement::for_batch(&batch).unwrap();

        let (sql, params) = render_insert(&stmt).unwrap();
        assert!(sql.ends_with("VALUES (?, ?, ?)"));
        assert_eq!(params, vec![Value::Int(7), Value::Int(8), Value::Int(9)]);
    }

    #[test]
    fn test_rejects_too_many_placeholders() {
        let rows = MAX_PLACEHOLDERS / PanelOrderItem::COLUMNS.len() + 1;
        let batch = Batch::from((0..rows as i64).map(|i| item(i, 1, 1)).collect::<Vec<_>>());
        let stmt = InsertStatement::for_batch(&batch).unwrap();

        let err = render_insert(&stmt).unwrap_err();
        assert!(matches!(
            err,
            MySQLPopulatorError::TooManyPlaceholders {
                table: "panel_order_items",
                ..
            }
        ));
    }

    #[test]
    fn test_batch_size_checked_against_placeholder_limit() {
        let width = PanelOrderItem::COLUMNS.len();
        let largest = MAX_PLACEHOLDERS / width;

        assert!(check_batch_size(PanelOrderItem::TABLE, width, 10_000).is_ok());
        assert!(check_batch_size(PanelOrderItem::TABLE, width, largest).is_ok());

        let err = check_batch_size(PanelOrderItem::TABLE, width, 25_000).unwrap_err();
        assert!(matches!(
            err,
            MySQLPopulatorError::TooManyPlaceholders {
                count: 75_000,
                max: MAX_PLACEHOLDERS,
                ..
            }
        ));
        assert!(check_batch_size(PanelOrderItem::TABLE, width, largest + 1).is_err());
    }

    #[test]
    fn test_value_conversion() {
        assert_eq!(to_mysql_value(&FieldValue::Int(-3)), Value::Int(-3));
        assert_eq!(
            to_mysql_value(&FieldValue::Text("abc".to_string())),
            Value::Bytes(b"abc".to_vec())
        );
        assert_eq!(to_mysql_value(&FieldValue::Null), Value::NULL);
    }
}
