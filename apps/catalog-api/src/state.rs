//! Application state shared by the route builders.

use mongodb::{Client, Database};

use crate::config::Config;

/// Handle on the configured document store
#[derive(Clone)]
pub enum Storage {
    MongoDb {
        /// Shares the driver's connection pool across clones
        client: Client,
        db: Database,
    },
    /// Collections are created by the route builder and live as long as the router
    Memory,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Storage,
}

impl AppState {
    /// Driver client, when running against MongoDB
    pub fn mongo_client(&self) -> Option<&Client> {
        match &self.storage {
            Storage::MongoDb { client, .. } => Some(client),
            Storage::Memory => None,
        }
    }
}
