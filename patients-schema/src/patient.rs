use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /api/insert`.
///
/// Field values are kept as raw JSON and bound by their JSON type, so `age`
/// may be a float, a string or a boolean. An absent field is the same as
/// `null`. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct InsertPatientRequest {
    #[serde(default)]
    pub name: Option<Value>,

    #[serde(default)]
    pub age: Option<Value>,

    #[serde(default)]
    pub gender: Option<Value>,
}

impl From<Map<String, Value>> for InsertPatientRequest {
    fn from(mut object: Map<String, Value>) -> Self {
        Self {
            name: object.remove("name"),
            age: object.remove("age"),
            gender: object.remove("gender"),
        }
    }
}
