use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Coordenadas embutidas no endereço
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Geo {
    #[schema(example = "-37.3159")]
    pub lat: String,
    #[schema(example = "81.1496")]
    pub lng: String,
}

/// Endereço embutido (sem identidade própria)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Address {
    pub city: String,
    pub zipcode: String,
    pub geo: Geo,
}

/// User (armazenado no MongoDB, coleção `users`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub name: String,

    /// Único em toda a coleção (índice unique)
    pub email: String,

    pub phone: String,
    pub company: String,
    pub address: Address,

    /// Definido uma única vez, na criação
    pub created_at: DateTime,

    /// Atualizado a cada mutação
    pub updated_at: DateTime,

    /// Marcador de revisão do documento
    #[serde(rename = "__v", default)]
    pub version: i32,
}

impl User {
    /// Builds a fresh document from validated fields. The id is assigned by the store.
    pub fn new(fields: NewUser, now: DateTime) -> Self {
        User {
            id: None,
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            company: fields.company,
            address: fields.address,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// Stamp for the next mutation: now, but always strictly after the
    /// current `updatedAt` (BSON dates have millisecond precision).
    pub fn next_updated_at(&self) -> DateTime {
        let now = DateTime::now().timestamp_millis();
        DateTime::from_millis(now.max(self.updated_at.timestamp_millis() + 1))
    }
}

/// Validated fields of a user about to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub address: Address,
}

/// Validated subset of fields supplied to an update. `None` means "keep".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<Address>,
}

// ==================== REQUEST MODELS ====================

#[derive(Deserialize)]
#[serde(untagged)]
enum Text {
    Str(String),
    Int(i64),
    Float(f64),
}

/// Accepts a JSON string or number; numbers are kept as their decimal text.
fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Text>::deserialize(deserializer)?.map(|value| match value {
        Text::Str(s) => s,
        Text::Int(n) => n.to_string(),
        Text::Float(f) => f.to_string(),
    }))
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct GeoInput {
    #[serde(default, deserialize_with = "text")]
    pub lat: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub lng: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct AddressInput {
    #[serde(default, deserialize_with = "text")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub zipcode: Option<String>,
    #[serde(default)]
    pub geo: Option<GeoInput>,
}

/// Request body for create (all fields expected) and update (any subset).
///
/// Every field is optional at the serde level so that missing fields are
/// reported by validation, all at once, instead of failing deserialization.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct UserInput {
    #[serde(default, deserialize_with = "text")]
    #[schema(example = "Leanne Graham")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text")]
    #[schema(example = "sincere@april.biz")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub company: Option<String>,
    #[serde(default)]
    pub address: Option<AddressInput>,
}

impl UserInput {
    /// Overlays the supplied fields on top of `existing`. A supplied address
    /// replaces the stored one as a whole.
    pub fn merged_onto(&self, existing: &User) -> UserInput {
        UserInput {
            name: self.name.clone().or_else(|| Some(existing.name.clone())),
            email: self.email.clone().or_else(|| Some(existing.email.clone())),
            phone: self.phone.clone().or_else(|| Some(existing.phone.clone())),
            company: self.company.clone().or_else(|| Some(existing.company.clone())),
            address: self
                .address
                .clone()
                .or_else(|| Some(AddressInput::from(&existing.address))),
        }
    }
}

impl From<&Address> for AddressInput {
    fn from(address: &Address) -> Self {
        AddressInput {
            city: Some(address.city.clone()),
            zipcode: Some(address.zipcode.clone()),
            geo: Some(GeoInput {
                lat: Some(address.geo.lat.clone()),
                lng: Some(address.geo.lng.clone()),
            }),
        }
    }
}

// ==================== RESPONSE MODELS ====================

/// JSON representation of a user
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    #[schema(example = "65a1c0f2e4b0a1b2c3d4e5f6")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub address: Address,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "__v")]
    pub version: i32,
}

fn to_utc(dt: DateTime) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or_default()
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        UserResponse {
            id: u.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: u.name,
            email: u.email,
            phone: u.phone,
            company: u.company,
            address: u.address,
            created_at: to_utc(u.created_at),
            updated_at: to_utc(u.updated_at),
            version: u.version,
        }
    }
}
