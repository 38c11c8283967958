/*
 * Responsibility
 * - Drinks の request/response DTO
 * - short 表現: recipe は color/parts のみ (材料名は公開しない)
 * - long 表現: recipe をそのまま返す (get:drinks-detail 以上)
 */
use serde::{Deserialize, Serialize};

use crate::repos::drink_repo::{DrinkRow, Ingredient};

// drinks.title is VARCHAR(80)
const TITLE_MAX_CHARS: usize = 80;

/// A recipe as clients send it: a list, or a single ingredient object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecipeInput {
    Many(Vec<Ingredient>),
    One(Ingredient),
}

impl RecipeInput {
    fn is_empty(&self) -> bool {
        matches!(self, RecipeInput::Many(items) if items.is_empty())
    }

    pub fn into_vec(self) -> Vec<Ingredient> {
        match self {
            RecipeInput::Many(items) => items,
            RecipeInput::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateDrinkRequest {
    pub title: String,
    pub recipe: RecipeInput,
}

impl CreateDrinkRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_drink(&self.title, &self.recipe)
    }
}

/// PATCH replaces the whole drink: both fields are required.
#[derive(Debug, Deserialize)]
pub struct UpdateDrinkRequest {
    pub title: String,
    pub recipe: RecipeInput,
}

impl UpdateDrinkRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_drink(&self.title, &self.recipe)
    }
}

fn validate_drink(title: &str, recipe: &RecipeInput) -> Result<(), &'static str> {
    if title.trim().is_empty() {
        return Err("title is required");
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err("title must be <= 80 chars");
    }
    if recipe.is_empty() {
        return Err("recipe must have at least one ingredient");
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct ShortIngredient {
    pub color: String,
    pub parts: u32,
}

#[derive(Debug, Serialize)]
pub struct ShortDrink {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<ShortIngredient>,
}

impl From<DrinkRow> for ShortDrink {
    fn from(row: DrinkRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            recipe: row
                .recipe
                .0
                .into_iter()
                .map(|i| ShortIngredient {
                    color: i.color,
                    parts: i.parts,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LongDrink {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl From<DrinkRow> for LongDrink {
    fn from(row: DrinkRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            recipe: row.recipe.0,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

impl<T> DrinksResponse<T> {
    pub fn ok(drinks: Vec<T>) -> Self {
        Self {
            success: true,
            drinks,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteDrinkResponse {
    pub success: bool,
    pub delete: i32,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use sqlx::types::Json;

    use super::*;

    fn row() -> DrinkRow {
        DrinkRow {
            id: 7,
            title: "matcha shake".into(),
            recipe: Json(vec![
                Ingredient {
                    name: "milk".into(),
                    color: "grey".into(),
                    parts: 1,
                },
                Ingredient {
                    name: "matcha".into(),
                    color: "green".into(),
                    parts: 3,
                },
            ]),
        }
    }

    #[test]
    fn short_form_redacts_ingredient_names() {
        let value = serde_json::to_value(ShortDrink::from(row())).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 7,
                "title": "matcha shake",
                "recipe": [
                    {"color": "grey", "parts": 1},
                    {"color": "green", "parts": 3}
                ]
            })
        );
    }

    #[test]
    fn long_form_exposes_the_full_recipe() {
        let value = serde_json::to_value(LongDrink::from(row())).unwrap();
        assert_eq!(value["recipe"][1], json!({"name": "matcha", "color": "green", "parts": 3}));
    }

    #[test]
    fn recipe_accepts_a_single_object() {
        let req: CreateDrinkRequest = serde_json::from_value(json!({
            "title": "water",
            "recipe": {"name": "water", "color": "blue", "parts": 1}
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.recipe.into_vec().len(), 1);
    }

    #[test]
    fn create_validation() {
        let parse = |v: serde_json::Value| serde_json::from_value::<CreateDrinkRequest>(v).unwrap();

        assert!(parse(json!({"title": "  ", "recipe": [{"name": "n", "color": "c", "parts": 1}]}))
            .validate()
            .is_err());
        assert!(parse(json!({"title": "T", "recipe": []})).validate().is_err());
        assert!(parse(json!({"title": "x".repeat(81), "recipe": {"name": "n", "color": "c", "parts": 1}}))
            .validate()
            .is_err());
        assert!(
            serde_json::from_value::<CreateDrinkRequest>(json!({"title": "T", "recipe": [{"name": "n"}]}))
                .is_err()
        );
    }

    #[test]
    fn update_requires_title_and_recipe() {
        let parse = |v: serde_json::Value| serde_json::from_value::<UpdateDrinkRequest>(v);

        assert!(parse(json!({})).is_err());
        assert!(parse(json!({"title": "Mocha"})).is_err());
        assert!(parse(json!({"recipe": [{"name": "n", "color": "c", "parts": 1}]})).is_err());

        let req = parse(json!({"title": "Mocha", "recipe": []})).unwrap();
        assert!(req.validate().is_err());

        let req = parse(json!({"title": "Mocha", "recipe": {"name": "cocoa", "color": "brown", "parts": 1}}))
            .unwrap();
        assert!(req.validate().is_ok());
    }
}
