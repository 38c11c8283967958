/*
 * Responsibility
 * - 起動時のスキーマ準備 (drinks テーブルが無ければ作る)
 * - 開発用: drop → create → seed (DB_RESET_ON_STARTUP=true の時のみ)
 */
use sqlx::PgPool;

use crate::repos::error::RepoError;

const CREATE_DRINKS: &str = r#"
    CREATE TABLE IF NOT EXISTS drinks (
        id      SERIAL PRIMARY KEY,
        title   VARCHAR(80) NOT NULL UNIQUE,
        recipe  JSONB NOT NULL
    )
"#;

pub async fn ensure(db: &PgPool) -> Result<(), RepoError> {
    sqlx::query(CREATE_DRINKS).execute(db).await?;
    Ok(())
}

/// Wipe the menu and start over with a single `water` drink.
pub async fn reset(db: &PgPool) -> Result<(), RepoError> {
    let mut tx = db.begin().await?;

    sqlx::query("DROP TABLE IF EXISTS drinks")
        .execute(&mut *tx)
        .await?;
    sqlx::query(CREATE_DRINKS).execute(&mut *tx).await?;
    sqlx::query(
        r#"
        INSERT INTO drinks (title, recipe)
        VALUES ('water', '[{"name": "water", "color": "blue", "parts": 1}]'::jsonb)
        "#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
