use recipe_catalog::config::{CatalogConfig, SecurityConfig};
use recipe_catalog::db::Store;
use recipe_catalog::domain::{Identity, ListOrText, MatchMode, RecipeId, UserId};
use recipe_catalog::models::{NewRecipe, RecipeFields};
use recipe_catalog::services::{
    AuthError, AuthService, RecipeError, RecipeService, SeaOrmAuthService, SeaOrmRecipeService,
    SearchCriteria,
};
use sea_orm::ConnectionTrait;

fn fast_security() -> SecurityConfig {
    SecurityConfig {
        argon2_memory_cost_kib: 1024,
        argon2_time_cost: 1,
        argon2_parallelism: 1,
    }
}

async fn setup() -> (Store, SeaOrmAuthService, SeaOrmRecipeService) {
    let store = Store::new("sqlite::memory:")
        .await
        .expect("Failed to open store");
    let auth = SeaOrmAuthService::new(store.clone(), fast_security());
    let recipes = SeaOrmRecipeService::new(store.clone(), CatalogConfig::default());
    (store, auth, recipes)
}

async fn admin_identity(auth: &SeaOrmAuthService) -> Identity {
    auth.authenticate("admin", "Admin123!")
        .await
        .expect("bootstrap admin login")
}

fn sample(title: &str) -> NewRecipe {
    NewRecipe {
        title: title.to_string(),
        description: None,
        ingredients: vec!["flour".to_string()],
        steps: vec!["Bake".to_string()],
        cooking_time: 30,
        difficulty: "Easy".to_string(),
        category: "Main".to_string(),
        image_url: "/static/img/default.jpg".to_string(),
    }
}

#[tokio::test]
async fn test_duplicate_username_conflicts() {
    let (_store, auth, _) = setup().await;

    auth.register("baker", "baker@example.com", "abc12345")
        .await
        .unwrap();

    let err = auth
        .register("baker", "baker2@example.com", "abc12345")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Conflict(_)));

    let err = auth
        .register("baker2", "baker@example.com", "abc12345")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Conflict(_)));
}

#[tokio::test]
async fn test_password_rules_on_register() {
    let (_store, auth, _) = setup().await;

    for password in ["abcdefgh", "пароль123", "Ab1"] {
        let err = auth
            .register("someone", "someone@example.com", password)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)), "{password}");
    }
}

#[tokio::test]
async fn test_authenticate_hides_failure_reason() {
    let (_store, auth, _) = setup().await;
    auth.register("baker", "baker@example.com", "abc12345")
        .await
        .unwrap();

    let identity = auth.authenticate("baker", "abc12345").await.unwrap();
    assert_eq!(identity.username, "baker");
    assert!(!identity.is_admin());

    let wrong = auth.authenticate("baker", "abc12346").await.unwrap_err();
    let unknown = auth.authenticate("nobody", "abc12345").await.unwrap_err();
    assert!(matches!(wrong, AuthError::InvalidCredentials));
    assert_eq!(wrong.to_string(), unknown.to_string());
}

#[tokio::test]
async fn test_admin_cannot_be_deleted() {
    let (_store, auth, _) = setup().await;
    let admin = admin_identity(&auth).await;

    let err = auth.delete_user(&admin, admin.user_id).await.unwrap_err();
    assert!(matches!(err, AuthError::Forbidden(_)));

    let err = auth
        .delete_user(&admin, UserId::new(9999))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_user_cascades_to_recipes() {
    let (store, auth, _) = setup().await;
    let admin = admin_identity(&auth).await;

    let user_id = auth
        .register("owner", "owner@example.com", "abc12345")
        .await
        .unwrap();
    store
        .add_recipe(&sample("Bread"), Some(user_id))
        .await
        .unwrap();
    store
        .add_recipe(&sample("Buns"), Some(user_id))
        .await
        .unwrap();
    store
        .add_recipe(&sample("Admin pie"), Some(admin.user_id))
        .await
        .unwrap();

    let owner = auth.authenticate("owner", "abc12345").await.unwrap();
    let removed = auth.delete_user(&owner, user_id).await.unwrap();

    assert_eq!(removed, 2);
    assert_eq!(store.count_recipes_for_user(user_id).await.unwrap(), 0);
    assert_eq!(store.count_recipes().await.unwrap(), 1);
    assert!(store.get_user(user_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_user_delete_keeps_recipes() {
    let (store, auth, _) = setup().await;

    let user_id = auth
        .register("keeper", "keeper@example.com", "abc12345")
        .await
        .unwrap();
    store
        .add_recipe(&sample("Bread"), Some(user_id))
        .await
        .unwrap();
    store
        .add_recipe(&sample("Buns"), Some(user_id))
        .await
        .unwrap();

    // Fails the user row delete after the recipes are already gone.
    store
        .conn
        .execute_unprepared(
            "CREATE TRIGGER block_user_delete BEFORE DELETE ON users \
             BEGIN SELECT RAISE(ABORT, 'user delete blocked'); END;",
        )
        .await
        .unwrap();

    assert!(store.delete_user_with_recipes(user_id).await.is_err());

    assert_eq!(store.count_recipes_for_user(user_id).await.unwrap(), 2);
    assert!(store.get_user(user_id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_other_users_cannot_delete_each_other() {
    let (_store, auth, _) = setup().await;

    let first = auth
        .register("first", "first@example.com", "abc12345")
        .await
        .unwrap();
    auth.register("second", "second@example.com", "abc12345")
        .await
        .unwrap();
    let second = auth.authenticate("second", "abc12345").await.unwrap();

    let err = auth.delete_user(&second, first).await.unwrap_err();
    assert!(matches!(err, AuthError::Forbidden(_)));
}

#[tokio::test]
async fn test_page_beyond_end_is_empty() {
    let (store, _, recipes) = setup().await;

    for i in 0..10 {
        store
            .add_recipe(&sample(&format!("Recipe {i}")), None)
            .await
            .unwrap();
    }

    let listing = recipes.list(3, Some(12), None).await.unwrap();
    assert!(listing.recipes.is_empty());
    assert_eq!(listing.total, 10);
    assert_eq!(listing.pages, 1);

    let capped = recipes.list(1, Some(1000), None).await.unwrap();
    assert_eq!(capped.recipes.len(), 10);

    let far = recipes.list(u64::MAX / 2, Some(12), None).await.unwrap();
    assert!(far.recipes.is_empty());
    assert_eq!(far.total, 10);
    assert_eq!(far.pages, 1);

    let last = recipes.list(u64::MAX, Some(100), None).await.unwrap();
    assert!(last.recipes.is_empty());
    assert_eq!(last.current_page, u64::MAX);

    let empty_store = setup().await.2;
    let nothing = empty_store.list(1, None, None).await.unwrap();
    assert_eq!(nothing.total, 0);
    assert_eq!(nothing.pages, 0);
}

#[tokio::test]
async fn test_recipe_writes_need_admin() {
    let (_store, auth, recipes) = setup().await;
    let admin = admin_identity(&auth).await;

    let user_id = auth
        .register("reader", "reader@example.com", "abc12345")
        .await
        .unwrap();
    let reader = Identity {
        user_id,
        username: "reader".to_string(),
        is_admin: false,
    };

    let fields = RecipeFields {
        title: Some("Scones".to_string()),
        ingredients: Some(ListOrText::Text("flour 200g\nmilk 300ml".to_string())),
        steps: Some(ListOrText::List(vec!["Bake".to_string()])),
        cooking_time: Some(25),
        ..RecipeFields::default()
    };

    let err = recipes.create(&reader, fields.clone()).await.unwrap_err();
    assert!(matches!(err, RecipeError::Forbidden(_)));

    let recipe = recipes.create(&admin, fields).await.unwrap();
    assert_eq!(recipe.ingredients, vec!["flour 200g", "milk 300ml"]);
    assert_eq!(recipe.user_id, Some(admin.user_id));

    let err = recipes.delete(&reader, recipe.id).await.unwrap_err();
    assert!(matches!(err, RecipeError::Forbidden(_)));

    recipes.delete(&admin, recipe.id).await.unwrap();
    let err = recipes.get(recipe.id).await.unwrap_err();
    assert!(matches!(err, RecipeError::NotFound(_)));

    let err = recipes
        .delete(&admin, RecipeId::new(recipe.id.value()))
        .await
        .unwrap_err();
    assert!(matches!(err, RecipeError::NotFound(_)));
}

#[tokio::test]
async fn test_search_any_versus_all() {
    let (store, _, recipes) = setup().await;

    let mut milk_only = sample("Hot milk");
    milk_only.ingredients = vec!["milk 250ml".to_string()];
    store.add_recipe(&milk_only, None).await.unwrap();

    let any = SearchCriteria {
        ingredients: Some("milk,sugar".to_string()),
        ..SearchCriteria::default()
    };
    let outcome = recipes.search(&any).await.unwrap();
    assert_eq!(outcome.count, 1);

    let all = SearchCriteria {
        mode: MatchMode::All,
        ..any
    };
    let outcome = recipes.search(&all).await.unwrap();
    assert_eq!(outcome.count, 0);
    assert!(outcome.recipes.is_empty());
}

#[tokio::test]
async fn test_create_admin_promotes_existing_user() {
    let (store, auth, _) = setup().await;

    let id = auth
        .register("promoted", "promoted@example.com", "abc12345")
        .await
        .unwrap();
    let same = auth
        .create_admin("promoted", "ignored@example.com", "ignored1")
        .await
        .unwrap();
    assert_eq!(id, same);

    let user = store.get_user(id).await.unwrap().unwrap();
    assert!(user.is_admin);

    let fresh = auth
        .create_admin("chef_admin", "chef@example.com", "Chef1234")
        .await
        .unwrap();
    let identity = auth.authenticate("chef_admin", "Chef1234").await.unwrap();
    assert_eq!(identity.user_id, fresh);
    assert!(identity.is_admin());
}
