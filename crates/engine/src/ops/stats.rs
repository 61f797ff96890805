//! Aggregated views over one owner's transactions.
//!
//! Two views coexist on purpose. `summary` is windowed and keys months by
//! `(year, month)`; `analytics` scans everything, merges months across years
//! by calendar name and reports expense-only categories. Clients depend on
//! both shapes, so they stay separate code paths.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Months, NaiveTime, Utc};
use sea_orm::{QueryFilter, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, TransactionKind, transactions};

use super::list::ApplyTxFilters;
use super::{Engine, with_tx};

/// Trailing window of [`Engine::monthly_series`] used by [`Engine::summary`].
pub const DEFAULT_WINDOW_MONTHS: u32 = 6;
/// Number of category buckets [`Engine::summary`] keeps.
pub const DEFAULT_CATEGORY_LIMIT: usize = 10;

/// Label for records without a category in the analytics view.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Income/expense sums for one `(year, month)` bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthlyBucket {
    pub year: i32,
    pub month: u32,
    pub income_minor: i64,
    pub expense_minor: i64,
}

/// Sum of amounts for one literal category value (`None` = unset).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: Option<String>,
    pub total_minor: i64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Totals {
    pub income_minor: i64,
    pub expense_minor: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    pub monthly: Vec<MonthlyBucket>,
    pub categories: Vec<CategoryTotal>,
    pub totals: Totals,
}

/// Month bucket keyed by calendar-month name only; different years merge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthBucket {
    pub month: &'static str,
    pub income_minor: i64,
    pub expense_minor: i64,
}

/// Expense sum for one category, with unset coalesced to
/// [`UNCATEGORIZED_LABEL`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseCategoryTotal {
    pub category: String,
    pub total_minor: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Analytics {
    pub monthly: Vec<MonthBucket>,
    pub category_totals: Vec<ExpenseCategoryTotal>,
}

impl Engine {
    /// Income/expense sums per `(year, month)` over the trailing window.
    ///
    /// The window starts at midnight UTC of the day `window_months` months
    /// before now, inclusive. Months without records are not synthesized.
    pub async fn monthly_series(
        &self,
        owner_id: &str,
        window_months: u32,
    ) -> ResultEngine<Vec<MonthlyBucket>> {
        let window_start = monthly_window_start(Utc::now(), window_months)?;

        with_tx!(self, |db_tx| {
            let rows: Vec<transactions::Model> = transactions::Entity::find()
                .scope_owner(owner_id)
                .filter(transactions::Column::OccurredAt.gte(window_start))
                .all(&db_tx)
                .await?;
            fold_monthly(&rows)
        })
    }

    /// Sums per literal category over all of the owner's records, largest
    /// first, truncated to `limit`. Ties break on category name ascending,
    /// unset first.
    pub async fn category_totals(
        &self,
        owner_id: &str,
        limit: usize,
    ) -> ResultEngine<Vec<CategoryTotal>> {
        with_tx!(self, |db_tx| {
            let rows: Vec<transactions::Model> = transactions::Entity::find()
                .scope_owner(owner_id)
                .all(&db_tx)
                .await?;
            Ok(fold_categories(rows, limit))
        })
    }

    /// Overall income and expense sums; 0 for a kind with no records.
    pub async fn totals(&self, owner_id: &str) -> ResultEngine<Totals> {
        with_tx!(self, |db_tx| {
            let rows: Vec<transactions::Model> = transactions::Entity::find()
                .scope_owner(owner_id)
                .all(&db_tx)
                .await?;
            fold_totals(&rows)
        })
    }

    /// The windowed summary view: monthly series, top categories and totals,
    /// computed against one snapshot of the store.
    pub async fn summary(&self, owner_id: &str) -> ResultEngine<Summary> {
        let window_start = monthly_window_start(Utc::now(), DEFAULT_WINDOW_MONTHS)?;

        with_tx!(self, |db_tx| {
            let windowed: Vec<transactions::Model> = transactions::Entity::find()
                .scope_owner(owner_id)
                .filter(transactions::Column::OccurredAt.gte(window_start))
                .all(&db_tx)
                .await?;
            let all: Vec<transactions::Model> = transactions::Entity::find()
                .scope_owner(owner_id)
                .all(&db_tx)
                .await?;

            let monthly = fold_monthly(&windowed)?;
            let totals = fold_totals(&all)?;
            let categories = fold_categories(all, DEFAULT_CATEGORY_LIMIT);

            Ok(Summary {
                monthly,
                categories,
                totals,
            })
        })
    }

    /// The unwindowed analytics view.
    ///
    /// Scans every record; months are keyed by calendar name so two Januaries
    /// from different years land in one "Jan" bucket, emitted in calendar
    /// order. The category breakdown covers expenses only, with unset
    /// categories under [`UNCATEGORIZED_LABEL`].
    pub async fn analytics(&self, owner_id: &str) -> ResultEngine<Analytics> {
        with_tx!(self, |db_tx| {
            let rows: Vec<transactions::Model> = transactions::Entity::find()
                .scope_owner(owner_id)
                .all(&db_tx)
                .await?;

            let mut months: BTreeMap<u32, (i64, i64)> = BTreeMap::new();
            let mut categories: BTreeMap<String, i64> = BTreeMap::new();

            for model in &rows {
                let entry = months.entry(model.occurred_at.month()).or_insert((0, 0));
                match TransactionKind::try_from(model.kind.as_str())? {
                    TransactionKind::Income => entry.0 += model.amount_minor,
                    TransactionKind::Expense => {
                        entry.1 += model.amount_minor;
                        let label = model
                            .category
                            .clone()
                            .unwrap_or_else(|| UNCATEGORIZED_LABEL.to_string());
                        *categories.entry(label).or_insert(0) += model.amount_minor;
                    }
                }
            }

            let monthly = months
                .into_iter()
                .map(|(month, (income_minor, expense_minor))| MonthBucket {
                    month: MONTH_NAMES[month as usize - 1],
                    income_minor,
                    expense_minor,
                })
                .collect();

            let mut category_totals: Vec<ExpenseCategoryTotal> = categories
                .into_iter()
                .map(|(category, total_minor)| ExpenseCategoryTotal {
                    category,
                    total_minor,
                })
                .collect();
            category_totals.sort_by(|a, b| {
                b.total_minor
                    .cmp(&a.total_minor)
                    .then_with(|| a.category.cmp(&b.category))
            });

            Ok(Analytics {
                monthly,
                category_totals,
            })
        })
    }
}

fn monthly_window_start(now: DateTime<Utc>, window_months: u32) -> ResultEngine<DateTime<Utc>> {
    let day = now
        .date_naive()
        .checked_sub_months(Months::new(window_months))
        .ok_or_else(|| EngineError::Validation("window out of range".to_string()))?;
    Ok(day.and_time(NaiveTime::MIN).and_utc())
}

fn fold_monthly(rows: &[transactions::Model]) -> ResultEngine<Vec<MonthlyBucket>> {
    let mut buckets: BTreeMap<(i32, u32), (i64, i64)> = BTreeMap::new();
    for model in rows {
        let key = (model.occurred_at.year(), model.occurred_at.month());
        let entry = buckets.entry(key).or_insert((0, 0));
        match TransactionKind::try_from(model.kind.as_str())? {
            TransactionKind::Income => entry.0 += model.amount_minor,
            TransactionKind::Expense => entry.1 += model.amount_minor,
        }
    }

    Ok(buckets
        .into_iter()
        .map(|((year, month), (income_minor, expense_minor))| MonthlyBucket {
            year,
            month,
            income_minor,
            expense_minor,
        })
        .collect())
}

fn fold_categories(rows: Vec<transactions::Model>, limit: usize) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<Option<String>, i64> = BTreeMap::new();
    for model in rows {
        *totals.entry(model.category).or_insert(0) += model.amount_minor;
    }

    let mut out: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total_minor)| CategoryTotal {
            category,
            total_minor,
        })
        .collect();
    out.sort_by(|a, b| {
        b.total_minor
            .cmp(&a.total_minor)
            .then_with(|| a.category.cmp(&b.category))
    });
    out.truncate(limit);
    out
}

fn fold_totals(rows: &[transactions::Model]) -> ResultEngine<Totals> {
    let mut totals = Totals::default();
    for model in rows {
        match TransactionKind::try_from(model.kind.as_str())? {
            TransactionKind::Income => totals.income_minor += model.amount_minor,
            TransactionKind::Expense => totals.expense_minor += model.amount_minor,
        }
    }
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn model(kind: &str, amount_minor: i64, category: Option<&str>, rfc3339: &str) -> transactions::Model {
        let occurred_at = DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc);
        transactions::Model {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: "alice".to_string(),
            title: "x".to_string(),
            kind: kind.to_string(),
            amount_minor,
            category: category.map(ToString::to_string),
            occurred_at,
            created_at: occurred_at,
            updated_at: occurred_at,
        }
    }

    #[test]
    fn window_start_is_midnight_of_day_n_months_back() {
        let now = Utc.with_ymd_and_hms(2025, 7, 15, 13, 45, 12).unwrap();
        let start = monthly_window_start(now, 6).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn fold_monthly_sums_kinds_separately_and_sorts_ascending() {
        let rows = vec![
            model("income", 1000, None, "2025-02-10T10:00:00Z"),
            model("expense", 300, None, "2025-02-20T10:00:00Z"),
            model("income", 50, None, "2025-01-05T10:00:00Z"),
        ];
        let buckets = fold_monthly(&rows).unwrap();
        assert_eq!(buckets.len(), 2);
        assert_eq!((buckets[0].year, buckets[0].month), (2025, 1));
        assert_eq!(buckets[0].income_minor, 50);
        assert_eq!(buckets[0].expense_minor, 0);
        assert_eq!((buckets[1].year, buckets[1].month), (2025, 2));
        assert_eq!(buckets[1].income_minor, 1000);
        assert_eq!(buckets[1].expense_minor, 300);
    }

    #[test]
    fn fold_categories_breaks_ties_by_name_with_unset_first() {
        let rows = vec![
            model("expense", 500, Some("Food"), "2025-02-10T10:00:00Z"),
            model("expense", 500, Some("Bus"), "2025-02-11T10:00:00Z"),
            model("expense", 500, None, "2025-02-12T10:00:00Z"),
        ];
        let totals = fold_categories(rows, 10);
        assert_eq!(totals[0].category, None);
        assert_eq!(totals[1].category.as_deref(), Some("Bus"));
        assert_eq!(totals[2].category.as_deref(), Some("Food"));
    }

    #[test]
    fn fold_categories_truncates_to_limit() {
        let rows = vec![
            model("expense", 300, Some("A"), "2025-02-10T10:00:00Z"),
            model("expense", 200, Some("B"), "2025-02-10T10:00:00Z"),
            model("expense", 100, Some("C"), "2025-02-10T10:00:00Z"),
        ];
        let totals = fold_categories(rows, 2);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].category.as_deref(), Some("A"));
        assert_eq!(totals[1].category.as_deref(), Some("B"));
    }
}
