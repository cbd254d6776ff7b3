use std::sync::Arc;

use companion_chat_core::Companion;
use companion_chat_storage::CompanionStore;

use crate::error::ServiceError;

/// Read access to the persona catalogue.
pub struct CompanionService {
    store: Arc<dyn CompanionStore>,
}

impl CompanionService {
    #[must_use]
    pub fn new(store: Arc<dyn CompanionStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Companion>, ServiceError> {
        Ok(self.store.list_companions().await?)
    }
}
