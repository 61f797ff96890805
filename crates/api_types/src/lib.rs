use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RegisterUser {
        pub username: String,
        pub password: String,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub title: String,
        pub amount_minor: i64,
        pub kind: TransactionKind,
        pub category: Option<String>,
        /// RFC3339 timestamp, including timezone offset. Defaults to now.
        pub occurred_at: Option<DateTime<FixedOffset>>,
    }

    /// Partial update; absent fields are left unchanged. An empty `category`
    /// clears the stored one.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub title: Option<String>,
        pub amount_minor: Option<i64>,
        pub kind: Option<TransactionKind>,
        pub category: Option<String>,
        pub occurred_at: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub title: String,
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub category: Option<String>,
        pub occurred_at: DateTime<Utc>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// Query string for `GET /transactions`.
    ///
    /// Out-of-range `page`/`per_page` are coerced server-side, never
    /// rejected; an unrecognized `kind` value is ignored rather than
    /// refused, so it stays a plain string here.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionListQuery {
        pub page: Option<i64>,
        pub per_page: Option<i64>,
        pub kind: Option<String>,
        pub category: Option<String>,
        pub from: Option<DateTime<FixedOffset>>,
        pub to: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
        pub total: u64,
        pub page: u64,
        pub pages: u64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionDeleted {
        pub deleted: bool,
    }
}

pub mod stats {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyPoint {
        pub year: i32,
        pub month: u32,
        pub income_minor: i64,
        pub expense_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryTotalView {
        /// Literal stored category; `null` for records without one.
        pub category: Option<String>,
        pub total_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryResponse {
        pub monthly: Vec<MonthlyPoint>,
        pub categories: Vec<CategoryTotalView>,
        pub total_income_minor: i64,
        pub total_expense_minor: i64,
    }

    /// Month bucket keyed by calendar-month name; years merge.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthPoint {
        pub month: String,
        pub income_minor: i64,
        pub expense_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseCategoryView {
        pub category: String,
        pub total_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AnalyticsResponse {
        pub monthly: Vec<MonthPoint>,
        pub category_totals: Vec<ExpenseCategoryView>,
    }
}
