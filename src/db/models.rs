use crate::error::PatientsError;
use patients_schema::InsertPatientRequest;
use serde_json::Value;

/// A single bind parameter, typed after the JSON value it came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SqlValue {
    #[default]
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    /// null -> NULL, bool -> 0/1, integer -> INTEGER, other numbers -> REAL,
    /// string -> TEXT. Objects and arrays have no column representation.
    pub fn from_json(field: &'static str, value: Option<Value>) -> Result<Self, PatientsError> {
        match value {
            None | Some(Value::Null) => Ok(SqlValue::Null),
            Some(Value::Bool(b)) => Ok(SqlValue::Integer(i64::from(b))),
            Some(Value::Number(n)) => Ok(match n.as_i64() {
                Some(i) => SqlValue::Integer(i),
                None => SqlValue::Real(n.as_f64().unwrap_or(f64::NAN)),
            }),
            Some(Value::String(s)) => Ok(SqlValue::Text(s)),
            Some(Value::Array(_) | Value::Object(_)) => {
                Err(PatientsError::UnsupportedValue { field })
            }
        }
    }
}

/// Column values for a new `patients` row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientCreate {
    pub name: SqlValue,
    pub age: SqlValue,
    pub gender: SqlValue,
}

impl TryFrom<InsertPatientRequest> for PatientCreate {
    type Error = PatientsError;

    fn try_from(req: InsertPatientRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: SqlValue::from_json("name", req.name)?,
            age: SqlValue::from_json("age", req.age)?,
            gender: SqlValue::from_json("gender", req.gender)?,
        })
    }
}
