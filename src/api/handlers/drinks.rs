/*
 * Responsibility
 * - /drinks 系 CRUD handler
 * - 認可は route guard 済み。handler は AuthClaims を明示的な引数として受け取る
 * - write 系の失敗 (body 不正 / validation / 永続化) は全て 422 にまとめる
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::{
    api::{
        dto::drinks::{
            CreateDrinkRequest, DeleteDrinkResponse, DrinksResponse, LongDrink, ShortDrink,
            UpdateDrinkRequest,
        },
        extractors::{AuthClaims, DrinkId},
    },
    error::AppError,
    services::auth::Claims,
    state::AppState,
};

fn subject(claims: &Claims) -> &str {
    claims.sub.as_deref().unwrap_or("-")
}

fn unreadable_body(rejection: JsonRejection) -> AppError {
    tracing::warn!(error = %rejection, "unreadable drink payload");
    AppError::Unprocessable
}

fn invalid_body(reason: &'static str) -> AppError {
    tracing::warn!(reason, "invalid drink payload");
    AppError::Unprocessable
}

pub async fn list_drinks(
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<ShortDrink>>, AppError> {
    let rows = state.drinks.list().await?;

    Ok(Json(DrinksResponse::ok(
        rows.into_iter().map(ShortDrink::from).collect(),
    )))
}

pub async fn list_drinks_detail(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
) -> Result<Json<DrinksResponse<LongDrink>>, AppError> {
    let rows = state.drinks.list().await?;

    Ok(Json(DrinksResponse::ok(
        rows.into_iter().map(LongDrink::from).collect(),
    )))
}

pub async fn create_drink(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    body: Result<Json<CreateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinksResponse<LongDrink>>, AppError> {
    let Json(req) = body.map_err(unreadable_body)?;
    req.validate().map_err(invalid_body)?;

    let recipe = req.recipe.into_vec();
    let row = state
        .drinks
        .create(&req.title, &recipe)
        .await
        .map_err(AppError::unprocessable("insert drink"))?;

    tracing::info!(drink_id = row.id, sub = subject(&claims), "drink created");
    Ok(Json(DrinksResponse::ok(vec![LongDrink::from(row)])))
}

pub async fn update_drink(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    DrinkId(drink_id): DrinkId,
    body: Result<Json<UpdateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinksResponse<LongDrink>>, AppError> {
    // 404 takes precedence over anything wrong with the body.
    if state.drinks.get(drink_id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let Json(req) = body.map_err(unreadable_body)?;
    req.validate().map_err(invalid_body)?;

    let recipe = req.recipe.into_vec();
    let row = state
        .drinks
        .update(drink_id, &req.title, &recipe)
        .await
        .map_err(AppError::unprocessable("update drink"))?
        // deleted concurrently
        .ok_or(AppError::NotFound)?;

    tracing::info!(drink_id, sub = subject(&claims), "drink updated");
    Ok(Json(DrinksResponse::ok(vec![LongDrink::from(row)])))
}

pub async fn delete_drink(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    DrinkId(drink_id): DrinkId,
) -> Result<Json<DeleteDrinkResponse>, AppError> {
    let deleted = state
        .drinks
        .delete(drink_id)
        .await
        .map_err(AppError::unprocessable("delete drink"))?;

    if !deleted {
        return Err(AppError::NotFound);
    }

    tracing::info!(drink_id, sub = subject(&claims), "drink deleted");
    Ok(Json(DeleteDrinkResponse {
        success: true,
        delete: drink_id,
    }))
}
