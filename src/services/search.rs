//! Recipe search: free-text query, ingredient terms and attribute filters.

use crate::domain::MatchMode;
use crate::models::Recipe;

/// Parsed search parameters. Empty values impose no constraint.
#[derive(Debug, Clone, Default)]
pub struct SearchCriteria {
    pub query: Option<String>,
    /// Comma-separated ingredient terms as typed by the user.
    pub ingredients: Option<String>,
    pub mode: MatchMode,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub max_time: Option<i32>,
}

impl SearchCriteria {
    /// Lowercased, trimmed ingredient terms with blanks dropped.
    #[must_use]
    pub fn ingredient_terms(&self) -> Vec<String> {
        self.ingredients
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(|term| term.trim().to_lowercase())
                    .filter(|term| !term.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn query_text(&self) -> Option<String> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Matches, newest first, truncated to the result limit.
    pub recipes: Vec<Recipe>,
    /// Number of matches before truncation.
    pub count: usize,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn matches_ingredients(recipe: &Recipe, terms: &[String], mode: MatchMode) -> bool {
    if terms.is_empty() {
        return true;
    }

    let haystack = recipe.ingredients.join("\n").to_lowercase();
    match mode {
        MatchMode::Any => terms.iter().any(|term| haystack.contains(term.as_str())),
        MatchMode::All => terms.iter().all(|term| haystack.contains(term.as_str())),
    }
}

fn matches_query(recipe: &Recipe, query: &str) -> bool {
    recipe.title.to_lowercase().contains(query)
        || recipe
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(query))
}

/// Filters `recipes` (expected newest first) against `criteria`.
#[must_use]
pub fn search(recipes: Vec<Recipe>, criteria: &SearchCriteria, limit: usize) -> SearchOutcome {
    let query = criteria.query_text();
    let terms = criteria.ingredient_terms();
    let category = non_empty(criteria.category.as_ref());
    let difficulty = non_empty(criteria.difficulty.as_ref());

    let matched: Vec<Recipe> = recipes
        .into_iter()
        .filter(|r| query.as_deref().is_none_or(|q| matches_query(r, q)))
        .filter(|r| matches_ingredients(r, &terms, criteria.mode))
        .filter(|r| category.is_none_or(|c| r.category == c))
        .filter(|r| difficulty.is_none_or(|d| r.difficulty == d))
        .filter(|r| criteria.max_time.is_none_or(|t| r.cooking_time <= t))
        .collect();

    let count = matched.len();
    let recipes = matched.into_iter().take(limit).collect();

    SearchOutcome { recipes, count }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RecipeId;

    fn recipe(id: i32, title: &str, ingredients: &[&str], time: i32, category: &str) -> Recipe {
        Recipe {
            id: RecipeId::new(id),
            title: title.to_string(),
            description: None,
            ingredients: ingredients.iter().map(ToString::to_string).collect(),
            steps: vec!["Cook".to_string()],
            cooking_time: time,
            difficulty: "Easy".to_string(),
            category: category.to_string(),
            image_url: "/static/img/default.jpg".to_string(),
            created_at: format!("2024-01-0{id}T00:00:00.000000Z"),
            user_id: None,
        }
    }

    fn catalog() -> Vec<Recipe> {
        vec![
            recipe(3, "Omelette", &["eggs 3", "Milk 50ml"], 10, "Breakfast"),
            recipe(2, "Sweet tea", &["tea", "sugar 1 tsp"], 5, "Drinks"),
            recipe(1, "Pancakes", &["flour", "milk", "sugar"], 20, "Breakfast"),
        ]
    }

    fn ids(outcome: &SearchOutcome) -> Vec<i32> {
        outcome.recipes.iter().map(|r| r.id.value()).collect()
    }

    #[test]
    fn any_and_all_ingredient_modes() {
        let any = SearchCriteria {
            ingredients: Some("milk, sugar".to_string()),
            ..SearchCriteria::default()
        };
        assert_eq!(ids(&search(catalog(), &any, 50)), vec![3, 2, 1]);

        let all = SearchCriteria {
            mode: MatchMode::All,
            ..any
        };
        assert_eq!(ids(&search(catalog(), &all, 50)), vec![1]);
    }

    #[test]
    fn blank_ingredient_terms_are_ignored() {
        let criteria = SearchCriteria {
            ingredients: Some(" , TEA ,".to_string()),
            mode: MatchMode::All,
            ..SearchCriteria::default()
        };
        assert_eq!(criteria.ingredient_terms(), vec!["tea"]);
        assert_eq!(ids(&search(catalog(), &criteria, 50)), vec![2]);
    }

    #[test]
    fn query_matches_title_or_description() {
        let mut recipes = catalog();
        recipes[1].description = Some("A PANCAKE companion".to_string());

        let criteria = SearchCriteria {
            query: Some("pancake".to_string()),
            ..SearchCriteria::default()
        };
        assert_eq!(ids(&search(recipes, &criteria, 50)), vec![2, 1]);
    }

    #[test]
    fn attribute_filters_combine() {
        let criteria = SearchCriteria {
            category: Some("Breakfast".to_string()),
            max_time: Some(15),
            ..SearchCriteria::default()
        };
        assert_eq!(ids(&search(catalog(), &criteria, 50)), vec![3]);

        let difficulty = SearchCriteria {
            difficulty: Some("Hard".to_string()),
            ..SearchCriteria::default()
        };
        assert_eq!(search(catalog(), &difficulty, 50).count, 0);
    }

    #[test]
    fn limit_truncates_but_count_is_total() {
        let outcome = search(catalog(), &SearchCriteria::default(), 2);
        assert_eq!(outcome.count, 3);
        assert_eq!(ids(&outcome), vec![3, 2]);
    }
}
