use dish_it_out::model::RecipeInput;
use dish_it_out::{DishError, HistoryStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

/// Store in a fresh directory; keep the `TempDir` alive for the whole test.
fn temp_store() -> (TempDir, HistoryStore) {
    let dir = TempDir::new().unwrap();
    let store = HistoryStore::new(dir.path().join("recipe_history.json"));
    (dir, store)
}

fn recipe(name: &str, url: Option<&str>) -> RecipeInput {
    RecipeInput {
        name: name.to_string(),
        url: url.map(str::to_string),
        source: Some("AllRecipes".to_string()),
        ..Default::default()
    }
}

fn url_for(i: usize) -> String {
    format!("https://www.allrecipes.com/recipe/{i}/dish-{i}/")
}

#[tokio::test]
async fn test_first_add_to_empty_store() {
    let (_dir, store) = temp_store();

    let entry = store.add(recipe("Soup", None)).await.unwrap();

    assert_eq!(entry.cook_count, 1);
    assert!(entry.is_history);
    let history = store.read().await.unwrap();
    assert_eq!(history, vec![entry]);
}

#[tokio::test]
async fn test_same_url_is_merged() {
    let (_dir, store) = temp_store();
    let url = url_for(1);

    store.add(recipe("Dish One", Some(&url))).await.unwrap();
    let entry = store.add(recipe("Dish One", Some(&url))).await.unwrap();

    assert_eq!(entry.cook_count, 2);
    let history = store.read().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].cook_count, 2);
}

#[tokio::test]
async fn test_url_less_recipes_merge_on_name_and_source() {
    let (_dir, store) = temp_store();

    store.add(recipe("Grandma's Stew", None)).await.unwrap();
    store.add(recipe("Grandma's Stew", None)).await.unwrap();

    let mut other = recipe("Grandma's Stew", None);
    other.source = Some("Notebook".to_string());
    store.add(other).await.unwrap();

    let history = store.read().await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].source.as_deref(), Some("Notebook"));
    assert_eq!(history[1].cook_count, 2);
}

#[tokio::test]
async fn test_repeat_cook_moves_entry_to_front() {
    let (_dir, store) = temp_store();
    let (a, b) = (url_for(1), url_for(2));

    store.add(recipe("Recipe A", Some(&a))).await.unwrap();
    store.add(recipe("Recipe B", Some(&b))).await.unwrap();
    store.add(recipe("Recipe A", Some(&a))).await.unwrap();

    let history = store.read().await.unwrap();
    let names: Vec<_> = history.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Recipe A", "Recipe B"]);
    assert_eq!(history[0].cook_count, 2);
    assert_eq!(history[1].cook_count, 1);
    assert!(history[0].last_cooked >= history[1].last_cooked);
}

#[tokio::test]
async fn test_store_keeps_fifty_most_recent() {
    let (_dir, store) = temp_store();

    for i in 0..51 {
        store
            .add(recipe(&format!("Dish {i}"), Some(&url_for(i))))
            .await
            .unwrap();
    }

    let history = store.read().await.unwrap();
    assert_eq!(history.len(), 50);
    assert_eq!(history[0].name, "Dish 50");
    assert_eq!(history[49].name, "Dish 1");
    assert!(!history.iter().any(|e| e.name == "Dish 0"));
}

#[tokio::test]
async fn test_merge_keeps_stats_and_adds_new_fields() {
    let (_dir, store) = temp_store();
    let url = url_for(7);

    let mut first = recipe("Chili", Some(&url));
    first.time = Some(45);
    store.add(first).await.unwrap();

    let mut again = recipe("Chili", Some(&url));
    again.cook_count = Some(99);
    again.is_history = Some(false);
    again
        .extra
        .insert("ingredients".to_string(), json!(["beans", "beef"]));
    let entry = store.add(again).await.unwrap();

    assert_eq!(entry.cook_count, 2);
    assert!(entry.is_history);
    assert_eq!(entry.time, Some(45));
    assert_eq!(entry.extra["ingredients"], json!(["beans", "beef"]));
}

#[tokio::test]
async fn test_clear_then_read_is_empty() {
    let (_dir, store) = temp_store();

    store.add(recipe("Soup", None)).await.unwrap();
    store.clear().await.unwrap();

    assert!(store.read().await.unwrap().is_empty());
    assert!(!store.path().exists());
    // clearing again is fine
    store.clear().await.unwrap();
}

#[tokio::test]
async fn test_missing_document_reads_empty() {
    let (_dir, store) = temp_store();
    assert!(store.read().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_blank_name_is_rejected() {
    let (_dir, store) = temp_store();

    let result = store.add(recipe("   ", None)).await;

    assert!(matches!(result, Err(DishError::Validation(_))));
    assert!(!store.path().exists());
}

#[tokio::test]
async fn test_document_uses_stable_field_names() {
    let (_dir, store) = temp_store();
    store
        .add(recipe("Fish Tacos", Some(&url_for(3))))
        .await
        .unwrap();

    let raw = std::fs::read_to_string(store.path()).unwrap();
    let value: Value = serde_json::from_str(&raw).unwrap();
    let entry = &value[0];

    for key in [
        "id",
        "name",
        "url",
        "time",
        "dishes",
        "source",
        "isHistory",
        "lastCooked",
        "cookCount",
    ] {
        assert!(entry.get(key).is_some(), "missing field {key}");
    }
    assert_eq!(entry["id"], json!("dish-3"));
    assert!(!store.path().with_file_name("recipe_history.json.tmp").exists());
}

#[tokio::test]
async fn test_corrupt_document_is_not_overwritten() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("recipe_history.json");
    std::fs::write(&path, "{ not json").unwrap();
    let store = HistoryStore::new(&path);

    assert!(matches!(store.read().await, Err(DishError::Json(_))));
    assert!(matches!(
        store.add(recipe("Soup", None)).await,
        Err(DishError::Json(_))
    ));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
}

#[tokio::test]
async fn test_concurrent_adds_are_not_lost() {
    let (_dir, store) = temp_store();
    let store = Arc::new(store);

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .add(recipe(&format!("Dish {i}"), Some(&url_for(i))))
                    .await
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.read().await.unwrap().len(), 20);
}

#[tokio::test]
async fn test_custom_limit() {
    let (_dir, store) = temp_store();
    let store = store.with_max_entries(3);

    for i in 0..5 {
        store
            .add(recipe(&format!("Dish {i}"), Some(&url_for(i))))
            .await
            .unwrap();
    }

    let names: Vec<_> = store
        .read()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["Dish 4", "Dish 3", "Dish 2"]);
}

#[tokio::test]
async fn test_reads_timestamps_without_offset() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("recipe_history.json");
    let existing = json!([{
        "id": "soup",
        "name": "Soup",
        "url": null,
        "source": "AllRecipes",
        "isHistory": true,
        "lastCooked": "2024-05-01T10:00:00.123456",
        "cookCount": 1
    }]);
    std::fs::write(&path, existing.to_string()).unwrap();
    let store = HistoryStore::new(&path);

    let entries = store.read().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0].last_cooked.to_rfc3339(),
        "2024-05-01T10:00:00.123456+00:00"
    );

    let entry = store.add(recipe("Soup", None)).await.unwrap();
    assert_eq!(entry.cook_count, 2);

    let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let last_cooked = written[0]["lastCooked"].as_str().unwrap();
    assert!(last_cooked.ends_with('Z'), "not RFC 3339: {last_cooked}");
}
