//! Statistics API endpoints

use api_types::stats::{
    AnalyticsResponse, CategoryTotalView, ExpenseCategoryView, MonthPoint, MonthlyPoint,
    SummaryResponse,
};
use axum::{Extension, Json, extract::State};

use crate::{ServerError, server::ServerState, user};

/// Windowed summary: trailing monthly series, top categories and totals.
pub async fn summary(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<SummaryResponse>, ServerError> {
    let summary = state.engine.summary(&user.username).await?;

    Ok(Json(SummaryResponse {
        monthly: summary
            .monthly
            .into_iter()
            .map(|bucket| MonthlyPoint {
                year: bucket.year,
                month: bucket.month,
                income_minor: bucket.income_minor,
                expense_minor: bucket.expense_minor,
            })
            .collect(),
        categories: summary
            .categories
            .into_iter()
            .map(|total| CategoryTotalView {
                category: total.category,
                total_minor: total.total_minor,
            })
            .collect(),
        total_income_minor: summary.totals.income_minor,
        total_expense_minor: summary.totals.expense_minor,
    }))
}

/// Unwindowed view: name-keyed month buckets and expense-only categories.
pub async fn analytics(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<AnalyticsResponse>, ServerError> {
    let analytics = state.engine.analytics(&user.username).await?;

    Ok(Json(AnalyticsResponse {
        monthly: analytics
            .monthly
            .into_iter()
            .map(|bucket| MonthPoint {
                month: bucket.month.to_string(),
                income_minor: bucket.income_minor,
                expense_minor: bucket.expense_minor,
            })
            .collect(),
        category_totals: analytics
            .category_totals
            .into_iter()
            .map(|total| ExpenseCategoryView {
                category: total.category,
                total_minor: total.total_minor,
            })
            .collect(),
    }))
}
