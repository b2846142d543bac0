//! JSON bodies exchanged with the bakery backend.
//!
//! Field names follow the server (`nome`, `idade`, `sabor`, ...). Numbers the
//! old mobile client sent as text are accepted in either form when reading.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomerRecord {
    #[serde(deserialize_with = "lenient_u64")]
    pub id: u64,
    #[serde(rename = "nome", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "idade", default, deserialize_with = "lenient_u32_or_zero")]
    pub age: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCustomer {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "idade", serialize_with = "as_text")]
    pub age: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerUpdate {
    pub id: u64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "idade", serialize_with = "as_text")]
    pub age: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CakeSize {
    #[default]
    #[serde(rename = "PEQUENO")]
    Small,
    #[serde(rename = "MEDIO")]
    Medium,
    #[serde(rename = "GRANDE")]
    Large,
}

/// Numeric order status; the server marks accepted orders with `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(pub i64);

impl StatusCode {
    pub const PENDING: StatusCode = StatusCode(0);
    pub const ACCEPTED: StatusCode = StatusCode(1);

    pub fn is_accepted(self) -> bool {
        self == Self::ACCEPTED
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderRecord {
    #[serde(deserialize_with = "lenient_u64")]
    pub id: u64,
    #[serde(rename = "clienteid", alias = "clienteId", deserialize_with = "lenient_u64")]
    pub customer_id: u64,
    #[serde(rename = "sabor", default, deserialize_with = "null_as_default")]
    pub flavor: String,
    #[serde(rename = "quantidade", default, deserialize_with = "lenient_u32_or_zero")]
    pub quantity: u32,
    #[serde(rename = "tamanho", default, deserialize_with = "null_as_default")]
    pub size: CakeSize,
    /// Unix seconds.
    #[serde(rename = "data", default, deserialize_with = "null_as_default")]
    pub timestamp: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: StatusCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrder {
    #[serde(rename = "clienteId")]
    pub customer_id: u64,
    #[serde(rename = "sabor")]
    pub flavor: String,
    #[serde(rename = "quantidade", serialize_with = "as_text")]
    pub quantity: u32,
    #[serde(rename = "tamanho")]
    pub size: CakeSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    pub id: u64,
    pub status: StatusCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IdBody {
    pub id: u64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(u64),
    Text(String),
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(value) => Ok(value),
        NumberOrText::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Missing, null and blank values read as zero.
fn lenient_u32_or_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<NumberOrText>::deserialize(deserializer)? {
        None => 0,
        Some(NumberOrText::Number(value)) => value,
        Some(NumberOrText::Text(text)) if text.trim().is_empty() => 0,
        Some(NumberOrText::Text(text)) => {
            text.trim().parse().map_err(serde::de::Error::custom)?
        }
    };
    u32::try_from(value).map_err(serde::de::Error::custom)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// The server stores form input as text, so counts go out as digit strings.
fn as_text<S: Serializer>(value: &u32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
