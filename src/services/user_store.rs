// ==================== USER PERSISTENCE GATEWAY ====================
// CRUD sobre a coleção `users`, com validação e unicidade de email na escrita

use crate::{
    database::{MongoDB, USERS_COLLECTION},
    models::{User, UserInput, UserPatch},
    utils::{error::GatewayError, validation},
};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, to_bson, DateTime, Document};
use mongodb::options::ReturnDocument;
use mongodb::Collection;

/// Persistence port for users. Handlers hold it as `web::Data<dyn UserStore>`.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, GatewayError>;
    async fn fetch(&self, id: &str) -> Result<User, GatewayError>;
    async fn insert(&self, input: UserInput) -> Result<User, GatewayError>;
    async fn modify(&self, id: &str, input: UserInput) -> Result<User, GatewayError>;
    async fn remove(&self, id: &str) -> Result<(), GatewayError>;
    async fn ping(&self) -> Result<(), GatewayError>;
}

/// A malformed id can never match a document, so it is reported as NotFound.
pub fn parse_id(id: &str) -> Result<ObjectId, GatewayError> {
    ObjectId::parse_str(id).map_err(|_| GatewayError::NotFound)
}

/// `$set` body for an update: supplied fields plus the new `updatedAt`.
pub fn set_document(patch: &UserPatch, now: DateTime) -> Result<Document, GatewayError> {
    let mut set = doc! { "updatedAt": now };

    if let Some(name) = &patch.name { set.insert("name", name); }
    if let Some(email) = &patch.email { set.insert("email", email); }
    if let Some(phone) = &patch.phone { set.insert("phone", phone); }
    if let Some(company) = &patch.company { set.insert("company", company); }
    if let Some(address) = &patch.address {
        let address = to_bson(address).map_err(|e| GatewayError::Internal(e.to_string()))?;
        set.insert("address", address);
    }

    Ok(set)
}

pub struct MongoUserStore {
    db: MongoDB,
    users: Collection<User>,
}

impl MongoUserStore {
    pub fn new(db: MongoDB) -> Self {
        let users = db.collection::<User>(USERS_COLLECTION);
        Self { db, users }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn list(&self) -> Result<Vec<User>, GatewayError> {
        let cursor = self.users.find(doc! {}).await?;
        let users: Vec<User> = cursor.try_collect().await?;
        Ok(users)
    }

    async fn fetch(&self, id: &str) -> Result<User, GatewayError> {
        let object_id = parse_id(id)?;

        self.users
            .find_one(doc! { "_id": object_id })
            .await?
            .ok_or(GatewayError::NotFound)
    }

    async fn insert(&self, input: UserInput) -> Result<User, GatewayError> {
        let fields = validation::validate_new(&input).map_err(GatewayError::Validation)?;
        let mut user = User::new(fields, DateTime::now());

        let result = self.users.insert_one(&user).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| GatewayError::Internal("inserted id is not an ObjectId".to_string()))?;
        user.id = Some(id);

        log::debug!("💾 User inserted: {}", id);
        Ok(user)
    }

    async fn modify(&self, id: &str, input: UserInput) -> Result<User, GatewayError> {
        let object_id = parse_id(id)?;

        let existing = self
            .users
            .find_one(doc! { "_id": object_id })
            .await?
            .ok_or(GatewayError::NotFound)?;

        let patch = validation::validate_patch(&input, &existing).map_err(GatewayError::Validation)?;
        let set = set_document(&patch, existing.next_updated_at())?;

        // None here means the document was deleted after the read above.
        self.users
            .find_one_and_update(doc! { "_id": object_id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?
            .ok_or(GatewayError::NotFound)
    }

    async fn remove(&self, id: &str) -> Result<(), GatewayError> {
        let object_id = parse_id(id)?;

        let result = self.users.delete_one(doc! { "_id": object_id }).await?;
        if result.deleted_count == 0 {
            return Err(GatewayError::NotFound);
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), GatewayError> {
        self.db.ping().await?;
        Ok(())
    }
}
