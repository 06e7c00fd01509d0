//! In-memory `UserStore` used by handler tests. Mirrors the MongoDB gateway:
//! same validation, unique email, ObjectId ids.

use crate::{
    models::{User, UserInput},
    services::user_store::{parse_id, UserStore},
    utils::{error::GatewayError, validation},
};
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, DateTime};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<User>>,
    pub fail_all: bool,
}

impl InMemoryUserStore {
    pub fn failing() -> Self {
        Self { fail_all: true, ..Default::default() }
    }

    fn check(&self) -> Result<(), GatewayError> {
        if self.fail_all {
            return Err(GatewayError::Internal("connection refused: localhost:27017".to_string()));
        }
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

fn email_taken(users: &[User], email: &str, except: Option<ObjectId>) -> bool {
    users.iter().any(|u| u.email == email && u.id != except)
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn list(&self) -> Result<Vec<User>, GatewayError> {
        self.check()?;
        Ok(self.users.read().await.clone())
    }

    async fn fetch(&self, id: &str) -> Result<User, GatewayError> {
        self.check()?;
        let object_id = parse_id(id)?;
        self.users
            .read()
            .await
            .iter()
            .find(|u| u.id == Some(object_id))
            .cloned()
            .ok_or(GatewayError::NotFound)
    }

    async fn insert(&self, input: UserInput) -> Result<User, GatewayError> {
        self.check()?;
        let fields = validation::validate_new(&input).map_err(GatewayError::Validation)?;

        let mut users = self.users.write().await;
        if email_taken(&users, &fields.email, None) {
            return Err(GatewayError::DuplicateKey);
        }

        let mut user = User::new(fields, DateTime::now());
        user.id = Some(ObjectId::new());
        users.push(user.clone());
        Ok(user)
    }

    async fn modify(&self, id: &str, input: UserInput) -> Result<User, GatewayError> {
        self.check()?;
        let object_id = parse_id(id)?;

        let mut users = self.users.write().await;
        let index = users
            .iter()
            .position(|u| u.id == Some(object_id))
            .ok_or(GatewayError::NotFound)?;

        let patch = validation::validate_patch(&input, &users[index]).map_err(GatewayError::Validation)?;
        if let Some(email) = &patch.email {
            if email_taken(&users, email, Some(object_id)) {
                return Err(GatewayError::DuplicateKey);
            }
        }

        let user = &mut users[index];
        if let Some(name) = patch.name { user.name = name; }
        if let Some(email) = patch.email { user.email = email; }
        if let Some(phone) = patch.phone { user.phone = phone; }
        if let Some(company) = patch.company { user.company = company; }
        if let Some(address) = patch.address { user.address = address; }
        user.updated_at = user.next_updated_at();

        Ok(user.clone())
    }

    async fn remove(&self, id: &str) -> Result<(), GatewayError> {
        self.check()?;
        let object_id = parse_id(id)?;

        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != Some(object_id));
        if users.len() == before {
            return Err(GatewayError::NotFound);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), GatewayError> {
        self.check()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AddressInput, GeoInput};

    fn input(email: &str) -> UserInput {
        UserInput {
            name: Some("Clementine Bauch".into()),
            email: Some(email.into()),
            phone: Some("1-463-123-4447".into()),
            company: Some("Romaguera-Jacobson".into()),
            address: Some(AddressInput {
                city: Some("McKenziehaven".into()),
                zipcode: Some("59590-4157".into()),
                geo: Some(GeoInput { lat: Some("-68.6102".into()), lng: Some("-47.0653".into()) }),
            }),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamps() {
        let store = InMemoryUserStore::default();
        let user = store.insert(input("nathan@yesenia.net")).await.unwrap();

        assert!(user.id.is_some());
        assert_eq!(user.created_at, user.updated_at);
        assert_eq!(user.version, 0);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_on_insert_and_modify() {
        let store = InMemoryUserStore::default();
        store.insert(input("nathan@yesenia.net")).await.unwrap();
        let other = store.insert(input("julianne@kory.org")).await.unwrap();

        assert!(matches!(
            store.insert(input("nathan@yesenia.net")).await,
            Err(GatewayError::DuplicateKey)
        ));

        let change = UserInput { email: Some("nathan@yesenia.net".into()), ..Default::default() };
        let id = other.id.unwrap().to_hex();
        assert!(matches!(store.modify(&id, change).await, Err(GatewayError::DuplicateKey)));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_modify_with_own_email_is_allowed() {
        let store = InMemoryUserStore::default();
        let user = store.insert(input("nathan@yesenia.net")).await.unwrap();
        let id = user.id.unwrap().to_hex();

        let same = UserInput { email: Some("nathan@yesenia.net".into()), ..Default::default() };
        let updated = store.modify(&id, same).await.unwrap();
        assert!(updated.updated_at > user.updated_at);
    }

    #[tokio::test]
    async fn test_remove_twice_is_not_found() {
        let store = InMemoryUserStore::default();
        let user = store.insert(input("nathan@yesenia.net")).await.unwrap();
        let id = user.id.unwrap().to_hex();

        store.remove(&id).await.unwrap();
        assert!(matches!(store.remove(&id).await, Err(GatewayError::NotFound)));
        assert!(matches!(store.fetch(&id).await, Err(GatewayError::NotFound)));
    }
}
