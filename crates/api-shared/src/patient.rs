use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Patient create/update payload.
///
/// Every field is optional at the wire level so that a missing field is
/// reported by the validator alongside every other violation, instead of
/// failing JSON decoding on the first one. Numbers and booleans are read as
/// their text so a mistyped scalar is also left to the validator; objects and
/// arrays still fail decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientReq {
    #[schema(example = "Alice")]
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub name: Option<String>,
    #[schema(example = "a@x.com")]
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub email: Option<String>,
    #[schema(example = "1 Main St")]
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub address: Option<String>,
    /// ISO date, `YYYY-MM-DD`.
    #[schema(example = "1990-01-01")]
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub date_of_birth: Option<String>,
    /// ISO date, `YYYY-MM-DD`. Required on create, optional on update.
    #[schema(example = "2024-01-01")]
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub registered_date: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

fn scalar_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value.map(|scalar| match scalar {
        Scalar::Text(text) => text,
        Scalar::Int(n) => n.to_string(),
        Scalar::UInt(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
    }))
}

/// Patient as returned by every read or write endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientRes {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub address: String,
    pub date_of_birth: String,
    pub registered_date: String,
}
