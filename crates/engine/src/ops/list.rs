use chrono::{DateTime, Utc};
use sea_orm::{PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*};

use crate::{ResultEngine, Transaction, TransactionKind, transactions};

use super::{Engine, with_tx};

pub(super) const DEFAULT_PAGE: u64 = 1;
pub(super) const DEFAULT_PER_PAGE: u64 = 10;

/// Filters for listing transactions.
///
/// `from` and `to` are both inclusive, in UTC. Absent dimensions apply no
/// filtering.
#[derive(Clone, Debug, Default)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    /// Exact match on the stored category.
    pub category: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// 1-based page selection.
///
/// Absent or non-positive values are filled with the defaults (page 1,
/// 10 per page), never rejected.
#[derive(Clone, Copy, Debug, Default)]
pub struct PageRequest {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PageRequest {
    fn resolve(self) -> (u64, u64) {
        let page = match self.page {
            Some(page) if page >= 1 => page as u64,
            _ => DEFAULT_PAGE,
        };
        let per_page = match self.per_page {
            Some(per_page) if per_page >= 1 => per_page as u64,
            _ => DEFAULT_PER_PAGE,
        };
        (page, per_page)
    }
}

/// A page of transactions plus pagination totals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
}

pub(super) trait ApplyTxFilters: QueryFilter + Sized {
    fn scope_owner(self, owner_id: &str) -> Self;
    fn apply_tx_filters(self, filter: &TransactionFilter) -> Self;
}

impl<T> ApplyTxFilters for T
where
    T: QueryFilter + Sized,
{
    fn scope_owner(self, owner_id: &str) -> Self {
        self.filter(transactions::Column::OwnerId.eq(owner_id.to_string()))
    }

    fn apply_tx_filters(mut self, filter: &TransactionFilter) -> Self {
        if let Some(kind) = filter.kind {
            self = self.filter(transactions::Column::Kind.eq(kind.as_str()));
        }
        if let Some(category) = &filter.category {
            self = self.filter(transactions::Column::Category.eq(category.clone()));
        }
        if let Some(from) = filter.from {
            self = self.filter(transactions::Column::OccurredAt.gte(from));
        }
        if let Some(to) = filter.to {
            self = self.filter(transactions::Column::OccurredAt.lte(to));
        }

        self
    }
}

impl Engine {
    /// Lists one page of the owner's transactions, newest first.
    ///
    /// Ordered by `occurred_at` DESC, creation order as tie-break (`id` last
    /// for determinism). Pages past the end yield an empty page, not an
    /// error, and `pages == ceil(total / per_page)`.
    pub async fn list_transactions(
        &self,
        owner_id: &str,
        page_req: PageRequest,
        filter: &TransactionFilter,
    ) -> ResultEngine<TransactionPage> {
        let (page, per_page) = page_req.resolve();

        with_tx!(self, |db_tx| {
            let query = transactions::Entity::find()
                .scope_owner(owner_id)
                .apply_tx_filters(filter);

            let total = query.clone().count(&db_tx).await?;
            let pages = total.div_ceil(per_page);

            let rows: Vec<transactions::Model> = query
                .order_by_desc(transactions::Column::OccurredAt)
                .order_by_desc(transactions::Column::CreatedAt)
                .order_by_desc(transactions::Column::Id)
                .offset((page - 1) * per_page)
                .limit(per_page)
                .all(&db_tx)
                .await?;

            let mut out = Vec::with_capacity(rows.len());
            for model in rows {
                out.push(Transaction::try_from(model)?);
            }

            Ok(TransactionPage {
                transactions: out,
                total,
                page,
                pages,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_coerces_absent_and_non_positive() {
        assert_eq!(PageRequest::default().resolve(), (1, 10));
        let req = PageRequest {
            page: Some(0),
            per_page: Some(-3),
        };
        assert_eq!(req.resolve(), (1, 10));
        let req = PageRequest {
            page: Some(4),
            per_page: Some(25),
        };
        assert_eq!(req.resolve(), (4, 25));
    }
}
