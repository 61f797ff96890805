use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Transaction, TransactionKind, transactions};

use super::{Engine, normalize_optional_text, normalize_required_text, with_tx};

/// Inputs for creating a transaction.
#[derive(Clone, Debug)]
pub struct CreateTransactionCmd {
    pub owner_id: String,
    pub title: String,
    pub amount_minor: i64,
    pub kind: TransactionKind,
    pub category: Option<String>,
    /// Defaults to the creation instant when absent.
    pub occurred_at: Option<DateTime<Utc>>,
}

/// Partial update. Absent fields are left unchanged; an empty `category`
/// clears it. `id`, `owner_id` and `created_at` are never touched.
#[derive(Clone, Debug, Default)]
pub struct UpdateTransactionCmd {
    pub title: Option<String>,
    pub amount_minor: Option<i64>,
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    pub occurred_at: Option<DateTime<Utc>>,
}

impl Engine {
    /// Creates a transaction owned by `cmd.owner_id`.
    pub async fn create_transaction(
        &self,
        cmd: CreateTransactionCmd,
    ) -> ResultEngine<Transaction> {
        let title = normalize_required_text(&cmd.title, "title")?;
        let category = normalize_optional_text(cmd.category.as_deref());
        let now = Utc::now();

        let tx = Transaction::new(
            cmd.owner_id,
            title,
            cmd.kind,
            cmd.amount_minor,
            category,
            cmd.occurred_at.unwrap_or(now),
            now,
        )?;

        with_tx!(self, |db_tx| {
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            Ok(tx)
        })
    }

    /// Returns a single transaction after the ownership check.
    pub async fn transaction(
        &self,
        owner_id: &str,
        transaction_id: Uuid,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let model = self.require_owned(&db_tx, transaction_id, owner_id).await?;
            Transaction::try_from(model)
        })
    }

    /// Applies a partial update to an owned transaction.
    ///
    /// Refreshes `updated_at`; two concurrent updates race last-write-wins.
    pub async fn update_transaction(
        &self,
        owner_id: &str,
        transaction_id: Uuid,
        cmd: UpdateTransactionCmd,
    ) -> ResultEngine<Transaction> {
        let title = cmd
            .title
            .as_deref()
            .map(|title| normalize_required_text(title, "title"))
            .transpose()?;
        if let Some(amount_minor) = cmd.amount_minor
            && amount_minor <= 0
        {
            return Err(EngineError::Validation(
                "amount_minor must be > 0".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let model = self.require_owned(&db_tx, transaction_id, owner_id).await?;

            let mut active: transactions::ActiveModel = model.into();
            if let Some(title) = title {
                active.title = ActiveValue::Set(title);
            }
            if let Some(amount_minor) = cmd.amount_minor {
                active.amount_minor = ActiveValue::Set(amount_minor);
            }
            if let Some(kind) = cmd.kind {
                active.kind = ActiveValue::Set(kind.as_str().to_string());
            }
            if let Some(category) = cmd.category.as_deref() {
                active.category = ActiveValue::Set(normalize_optional_text(Some(category)));
            }
            if let Some(occurred_at) = cmd.occurred_at {
                active.occurred_at = ActiveValue::Set(occurred_at);
            }
            active.updated_at = ActiveValue::Set(Utc::now());

            let updated = active.update(&db_tx).await?;
            Transaction::try_from(updated)
        })
    }

    /// Deletes an owned transaction. The delete is terminal, no tombstone.
    pub async fn delete_transaction(
        &self,
        owner_id: &str,
        transaction_id: Uuid,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_owned(&db_tx, transaction_id, owner_id).await?;
            let active: transactions::ActiveModel = model.into();
            active.delete(&db_tx).await?;
            Ok(())
        })
    }
}
