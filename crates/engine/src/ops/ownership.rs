use sea_orm::{DatabaseTransaction, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, transactions};

use super::Engine;

/// Outcome of the ownership check on a single record.
///
/// Existence is decided before ownership, so a missing id reads as `Missing`
/// no matter who asks.
#[derive(Debug)]
pub(super) enum Ownership {
    Owned(transactions::Model),
    Foreign,
    Missing,
}

impl Ownership {
    pub(super) fn into_owned(self) -> ResultEngine<transactions::Model> {
        match self {
            Self::Owned(model) => Ok(model),
            Self::Foreign => Err(EngineError::Forbidden(
                "transaction not owned by caller".to_string(),
            )),
            Self::Missing => Err(EngineError::KeyNotFound(
                "transaction not exists".to_string(),
            )),
        }
    }
}

impl Engine {
    pub(super) async fn check_ownership(
        &self,
        db: &DatabaseTransaction,
        transaction_id: Uuid,
        owner_id: &str,
    ) -> ResultEngine<Ownership> {
        let model = transactions::Entity::find_by_id(transaction_id.to_string())
            .one(db)
            .await?;

        Ok(match model {
            None => Ownership::Missing,
            Some(model) if model.owner_id != owner_id => Ownership::Foreign,
            Some(model) => Ownership::Owned(model),
        })
    }

    /// Loads a single transaction, enforcing the existence-before-ownership
    /// order used by every get/update/delete.
    pub(super) async fn require_owned(
        &self,
        db: &DatabaseTransaction,
        transaction_id: Uuid,
        owner_id: &str,
    ) -> ResultEngine<transactions::Model> {
        self.check_ownership(db, transaction_id, owner_id)
            .await?
            .into_owned()
    }
}
