//! Repository layer for document store operations

pub mod distributors;
pub mod firestore;
pub mod promocodes;
pub mod users;

use crate::config::StoreConfig;

/// Main repository struct holding the document-store client
#[derive(Clone)]
pub struct Repository {
    pub store: firestore::FirestoreClient,
    pub users: users::UsersRepository,
    pub distributors: distributors::DistributorsRepository,
    pub promocodes: promocodes::PromoCodesRepository,
}

impl Repository {
    /// Create a new repository against the configured document store
    pub fn new(config: StoreConfig) -> Self {
        let store = firestore::FirestoreClient::new(config);
        Self {
            users: users::UsersRepository::new(store.clone()),
            distributors: distributors::DistributorsRepository::new(store.clone()),
            promocodes: promocodes::PromoCodesRepository::new(store.clone()),
            store,
        }
    }
}
