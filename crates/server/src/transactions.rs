//! Transactions API endpoints

use api_types::transaction::{
    TransactionDeleted, TransactionKind as ApiKind, TransactionListQuery, TransactionListResponse,
    TransactionNew, TransactionUpdate, TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn kind_to_engine(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Income => engine::TransactionKind::Income,
        ApiKind::Expense => engine::TransactionKind::Expense,
    }
}

fn kind_to_api(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Expense => ApiKind::Expense,
    }
}

fn to_view(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        title: tx.title,
        kind: kind_to_api(tx.kind),
        amount_minor: tx.amount_minor,
        category: tx.category,
        occurred_at: tx.occurred_at,
        created_at: tx.created_at,
        updated_at: tx.updated_at,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let tx = state
        .engine
        .create_transaction(engine::CreateTransactionCmd {
            owner_id: user.username,
            title: payload.title,
            amount_minor: payload.amount_minor,
            kind: kind_to_engine(payload.kind),
            category: payload.category,
            occurred_at: payload.occurred_at.map(|dt| dt.with_timezone(&Utc)),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(to_view(tx))))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let page_req = engine::PageRequest {
        page: query.page,
        per_page: query.per_page,
    };
    // Unrecognized kind values fall through to "no kind filtering".
    let kind = query.kind.as_deref().and_then(|kind| match kind {
        "income" => Some(engine::TransactionKind::Income),
        "expense" => Some(engine::TransactionKind::Expense),
        _ => None,
    });
    let filter = engine::TransactionFilter {
        kind,
        category: query.category,
        from: query.from.map(|dt| dt.with_timezone(&Utc)),
        to: query.to.map(|dt| dt.with_timezone(&Utc)),
    };

    let result = state
        .engine
        .list_transactions(&user.username, page_req, &filter)
        .await?;

    Ok(Json(TransactionListResponse {
        transactions: result.transactions.into_iter().map(to_view).collect(),
        total: result.total,
        page: result.page,
        pages: result.pages,
    }))
}

pub async fn get_by_id(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state.engine.transaction(&user.username, id).await?;
    Ok(Json(to_view(tx)))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state
        .engine
        .update_transaction(
            &user.username,
            id,
            engine::UpdateTransactionCmd {
                title: payload.title,
                amount_minor: payload.amount_minor,
                kind: payload.kind.map(kind_to_engine),
                category: payload.category,
                occurred_at: payload.occurred_at.map(|dt| dt.with_timezone(&Utc)),
            },
        )
        .await?;

    Ok(Json(to_view(tx)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionDeleted>, ServerError> {
    state.engine.delete_transaction(&user.username, id).await?;
    Ok(Json(TransactionDeleted { deleted: true }))
}
