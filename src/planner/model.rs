use std::fmt;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

/// Bumped whenever a tag is added to or removed from the vocabulary below.
pub const TAG_VOCABULARY_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Mifflin-St Jeor sex constant.
    pub fn bmr_constant(self) -> f64 {
        match self {
            Sex::Male => 5.0,
            Sex::Female => -161.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.20,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.90,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DietaryPattern {
    #[default]
    Free,
    Vegetarian,
    Vegan,
    Pescatarian,
    Keto,
    GlutenFree,
    Other,
}

impl DietaryPattern {
    /// Catalog diet tag a recipe must carry for this pattern, if any.
    pub fn diet_tag(self) -> Option<DietTag> {
        match self {
            DietaryPattern::Free | DietaryPattern::Other => None,
            DietaryPattern::Vegetarian => Some(DietTag::Vegetarian),
            DietaryPattern::Vegan => Some(DietTag::Vegan),
            DietaryPattern::Pescatarian => Some(DietTag::Pescatarian),
            DietaryPattern::Keto => Some(DietTag::Keto),
            DietaryPattern::GlutenFree => Some(DietTag::GlutenFree),
        }
    }
}

/// Meal occasions. Variant order is the canonical order of a day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Snack,
    Dinner,
}

impl MealSlot {
    pub fn tag(self) -> MealTimeTag {
        match self {
            MealSlot::Breakfast => MealTimeTag::Morning,
            MealSlot::Lunch => MealTimeTag::Midday,
            MealSlot::Snack => MealTimeTag::Afternoon,
            MealSlot::Dinner => MealTimeTag::Evening,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::Lunch => "Lunch",
            MealSlot::Snack => "Snack",
            MealSlot::Dinner => "Dinner",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MealTimeTag {
    Morning,
    Midday,
    Afternoon,
    Evening,
}

impl MealTimeTag {
    pub fn as_str(self) -> &'static str {
        match self {
            MealTimeTag::Morning => "morning",
            MealTimeTag::Midday => "midday",
            MealTimeTag::Afternoon => "afternoon",
            MealTimeTag::Evening => "evening",
        }
    }
}

impl fmt::Display for MealTimeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum DietTag {
    Vegetarian,
    Vegan,
    Pescatarian,
    Keto,
    GlutenFree,
}

impl DietTag {
    pub fn as_str(self) -> &'static str {
        match self {
            DietTag::Vegetarian => "vegetarian",
            DietTag::Vegan => "vegan",
            DietTag::Pescatarian => "pescatarian",
            DietTag::Keto => "keto",
            DietTag::GlutenFree => "gluten-free",
        }
    }
}

/// Physiological snapshot of a user. Every field the calculator needs is
/// optional here so that validation can name all missing ones at once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age: Option<u32>,
    pub birth_date: Option<Date>,
    pub sex: Option<Sex>,
    pub activity_level: Option<ActivityLevel>,
    #[serde(default)]
    pub dietary_pattern: DietaryPattern,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub meal_slots: Vec<MealSlot>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Completed,
    Cancelled,
    Paused,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub target_weight_kg: f64,
    /// Signed kg per week, negative for loss.
    pub weekly_rate_kg: f64,
    pub daily_calories: Option<f64>,
    pub status: GoalStatus,
}

/// {protein, carbs, fat, fiber, sugar} in grams. Absent fields read as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Macros {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub sugar: f64,
}

impl AddAssign for Macros {
    fn add_assign(&mut self, rhs: Self) {
        self.protein += rhs.protein;
        self.carbs += rhs.carbs;
        self.fat += rhs.fat;
        self.fiber += rhs.fiber;
        self.sugar += rhs.sugar;
    }
}

/// Catalog recipe as seen by the engine. Read-only input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeNutritionRecord {
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub macros: Macros,
}

/// One dish placed in a slot. Holds a copy of the recipe's nutrition taken
/// when the plan was generated, never a live reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedMeal {
    pub slot: MealSlot,
    pub recipe_id: Uuid,
    pub name: String,
    pub calories: f64,
    pub macros: Macros,
    pub image: Option<String>,
    pub ingredients: Vec<String>,
}

impl PlannedMeal {
    pub fn snapshot(slot: MealSlot, recipe: &RecipeNutritionRecord) -> Self {
        Self {
            slot,
            recipe_id: recipe.id,
            name: recipe.name.clone(),
            calories: recipe.calories,
            macros: recipe.macros,
            image: recipe.image.clone(),
            ingredients: recipe.ingredients.clone(),
        }
    }
}

/// Soft budget violations. Recorded on the plan, never raised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanWarning {
    SlotOverBudget {
        slot: MealSlot,
        budget: f64,
        calories: f64,
    },
    OverTarget {
        total_calories: f64,
        target_calories: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub meals: Vec<PlannedMeal>,
    pub total_calories: f64,
    pub total_macros: Macros,
    pub target_calories: f64,
    #[serde(default)]
    pub warnings: Vec<PlanWarning>,
}

impl DayPlan {
    pub fn is_over_target(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, PlanWarning::OverTarget { .. }))
    }

    pub(crate) fn clear_over_target(&mut self) {
        self.warnings
            .retain(|w| !matches!(w, PlanWarning::OverTarget { .. }));
    }
}
