//! The module contains the definition of a user and the registration
//! endpoint. Credentials never cross into the engine; only the username does.

use api_types::user::RegisterUser;
use axum::{Json, extract::State, http::StatusCode};
use engine::EngineError;
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{ServerError, server::ServerState};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub password: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Creates an account. The password is stored as a bcrypt hash.
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterUser>,
) -> Result<StatusCode, ServerError> {
    let username = payload.username.trim().to_string();
    if username.is_empty() || payload.password.is_empty() {
        return Err(ServerError::Generic(
            "username and password required".to_string(),
        ));
    }

    let existing = Entity::find_by_id(username.clone())
        .one(&state.db)
        .await
        .map_err(|err| ServerError::Generic(err.to_string()))?;
    if existing.is_some() {
        return Err(ServerError::Engine(EngineError::ExistingKey(username)));
    }

    let password = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|err| ServerError::Generic(err.to_string()))?;
    let user = ActiveModel {
        username: ActiveValue::Set(username),
        password: ActiveValue::Set(password),
    };
    user.insert(&state.db)
        .await
        .map_err(|err| ServerError::Generic(err.to_string()))?;

    Ok(StatusCode::CREATED)
}
