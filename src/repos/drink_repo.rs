/*
 * Responsibility
 * - drinks テーブル向け SQLx 操作
 * - recipe は JSONB (Ingredient の配列) として保存する
 * - DB エラーは RepoError に変換して返す (23505 → Conflict)
 */
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, types::Json};

use crate::repos::error::RepoError;

/// One line of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: u32,
}

#[derive(Debug, Clone, FromRow)]
pub struct DrinkRow {
    pub id: i32,
    pub title: String,
    pub recipe: Json<Vec<Ingredient>>,
}

/// Drink persistence.
///
/// `update` / `delete` report a missing id as `Ok(None)` / `Ok(false)`,
/// leaving the 404 decision to the handler.
#[async_trait]
pub trait DrinkRepo: Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<DrinkRow>, RepoError>;

    async fn get(&self, id: i32) -> Result<Option<DrinkRow>, RepoError>;

    async fn create(&self, title: &str, recipe: &[Ingredient]) -> Result<DrinkRow, RepoError>;

    async fn update(
        &self,
        id: i32,
        title: &str,
        recipe: &[Ingredient],
    ) -> Result<Option<DrinkRow>, RepoError>;

    async fn delete(&self, id: i32) -> Result<bool, RepoError>;
}

#[derive(Debug, Clone)]
pub struct PgDrinkRepo {
    db: PgPool,
}

impl PgDrinkRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DrinkRepo for PgDrinkRepo {
    async fn list(&self) -> Result<Vec<DrinkRow>, RepoError> {
        let rows = sqlx::query_as::<_, DrinkRow>(
            r#"
            SELECT id, title, recipe
            FROM drinks
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn get(&self, id: i32) -> Result<Option<DrinkRow>, RepoError> {
        let row = sqlx::query_as::<_, DrinkRow>(
            r#"
            SELECT id, title, recipe
            FROM drinks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn create(&self, title: &str, recipe: &[Ingredient]) -> Result<DrinkRow, RepoError> {
        let row = sqlx::query_as::<_, DrinkRow>(
            r#"
            INSERT INTO drinks (title, recipe)
            VALUES ($1, $2)
            RETURNING id, title, recipe
            "#,
        )
        .bind(title)
        .bind(Json(recipe))
        .fetch_one(&self.db)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }

    async fn update(
        &self,
        id: i32,
        title: &str,
        recipe: &[Ingredient],
    ) -> Result<Option<DrinkRow>, RepoError> {
        let row = sqlx::query_as::<_, DrinkRow>(
            r#"
            UPDATE drinks
            SET
                title = $2,
                recipe = $3
            WHERE id = $1
            RETURNING id, title, recipe
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(Json(recipe))
        .fetch_optional(&self.db)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }

    async fn delete(&self, id: i32) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            DELETE FROM drinks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
