use sqlx::FromRow;
use uuid::Uuid;

use crate::planner::model::{Macros, RecipeNutritionRecord};

#[derive(Debug, FromRow)]
pub struct RecipeRow {
    pub id: Uuid,
    pub name: String,
    pub image_url: Option<String>,
    pub ingredients: Vec<String>,
    pub calories: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub fiber_g: Option<f64>,
    pub sugar_g: Option<f64>,
}

impl From<RecipeRow> for RecipeNutritionRecord {
    fn from(r: RecipeRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            image: r.image_url,
            ingredients: r.ingredients,
            calories: r.calories.unwrap_or_default(),
            macros: Macros {
                protein: r.protein_g.unwrap_or_default(),
                carbs: r.carbs_g.unwrap_or_default(),
                fat: r.fat_g.unwrap_or_default(),
                fiber: r.fiber_g.unwrap_or_default(),
                sugar: r.sugar_g.unwrap_or_default(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_nutrition_reads_as_zero() {
        let row = RecipeRow {
            id: Uuid::new_v4(),
            name: "plain rice".into(),
            image_url: None,
            ingredients: vec!["rice".into()],
            calories: Some(210.0),
            protein_g: Some(4.0),
            carbs_g: None,
            fat_g: None,
            fiber_g: None,
            sugar_g: None,
        };
        let rec = RecipeNutritionRecord::from(row);
        assert_eq!(rec.calories, 210.0);
        assert_eq!(rec.macros.protein, 4.0);
        assert_eq!(rec.macros.carbs, 0.0);
        assert_eq!(rec.macros.sugar, 0.0);
    }
}
