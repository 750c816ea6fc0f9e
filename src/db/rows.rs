use base64::Engine as _;
use serde_json::{Map, Number, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

/// One result row keyed by column name, in column order.
pub type JsonRow = Map<String, Value>;

/// Converts a row of an arbitrary statement into a JSON object.
///
/// Types follow the storage class of each value, not the declared column type:
/// NULL -> null, INTEGER -> number, REAL -> number (non-finite -> null),
/// TEXT -> string, BLOB -> base64 string. A repeated column name keeps the last value.
pub fn row_to_json(row: &SqliteRow) -> Result<JsonRow, sqlx::Error> {
    let mut object = Map::with_capacity(row.columns().len());
    for column in row.columns() {
        let value = column_value(row, column.ordinal())?;
        object.insert(column.name().to_string(), value);
    }
    Ok(object)
}

fn column_value(row: &SqliteRow, index: usize) -> Result<Value, sqlx::Error> {
    let storage_class = {
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            return Ok(Value::Null);
        }
        raw.type_info().name().to_string()
    };

    let value = match storage_class.as_str() {
        "INTEGER" => Value::from(row.try_get::<i64, _>(index)?),
        "REAL" => Number::from_f64(row.try_get::<f64, _>(index)?).map_or(Value::Null, Value::Number),
        "BLOB" => Value::String(
            base64::engine::general_purpose::STANDARD.encode(row.try_get::<Vec<u8>, _>(index)?),
        ),
        _ => Value::String(row.try_get::<String, _>(index)?),
    };
    Ok(value)
}
