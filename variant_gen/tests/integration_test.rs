//! Integration tests for loading recipes from disk and generating variants

use std::io::Write;

use prairie_random::{DifficultyLevel, LinearSystem, Seed};
use tempfile::NamedTempFile;
use variant_gen::{generate_variant, Recipe};

const RECIPE: &str = r#"
[[param]]
name = "n"
kind = "int"
min = 2
max = 20
step = 2

[[param]]
name = "order"
kind = "permutation"
n = 5

[[param]]
name = "split"
kind = "category_counts"
total = 7
categories = 3

[[param]]
name = "poly"
kind = "polynomial"
degree = 3
zero_prob = 0.0

[system]
matrix = [[1.0, -1.0, 0.0, 0.0], [0.0, 1.0, -1.0, -1.0], [0.0, 0.0, 1.0, -2.0]]
groups = [[0], [1], [2, 3]]
answer_group = 0
difficulty = 2
"#;

fn write_recipe(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[test]
fn test_generate_from_file() {
    let file = write_recipe(RECIPE);
    let recipe = Recipe::from_file(file.path()).unwrap();
    assert_eq!(recipe.params.len(), 4);

    let variant = generate_variant(&recipe, Seed::from_base36("lab3").unwrap()).unwrap();

    let n = variant.params["n"].as_i64().unwrap();
    assert!((2..=20).contains(&n) && n % 2 == 0);

    let mut order: Vec<usize> = serde_json::from_value(variant.params["order"].clone()).unwrap();
    order.sort();
    assert_eq!(order, vec![0, 1, 2, 3, 4]);

    let split: Vec<usize> = serde_json::from_value(variant.params["split"].clone()).unwrap();
    assert_eq!(split.iter().sum::<usize>(), 7);

    let poly: Vec<i64> = serde_json::from_value(variant.params["poly"].clone()).unwrap();
    assert_eq!(poly.len(), 4);
    assert_ne!(poly[3], 0);
}

#[test]
fn test_given_variables_hit_target() {
    let recipe = Recipe::from_toml(RECIPE).unwrap();
    let system = recipe.system.as_ref().unwrap();
    let matrix: &LinearSystem = &system.matrix;

    for seed in 0..50u32 {
        let variant = generate_variant(&recipe, Seed::from(seed)).unwrap();
        let given = variant.given.unwrap();
        let variables = given.variables.unwrap();
        assert_eq!(
            matrix.classify_difficulty(0, &variables).unwrap(),
            DifficultyLevel::Sequential
        );
    }
}

#[test]
fn test_seed_reproduces_variant() {
    let recipe = Recipe::from_toml(RECIPE).unwrap();
    let seed = Seed::from_base36("variant42").unwrap();
    let first = serde_json::to_string(&generate_variant(&recipe, seed).unwrap()).unwrap();
    let second = serde_json::to_string(&generate_variant(&recipe, seed).unwrap()).unwrap();
    assert_eq!(first, second);

    let other = serde_json::to_string(&generate_variant(&recipe, Seed::from(1u32)).unwrap()).unwrap();
    assert_ne!(first, other);
}

#[test]
fn test_invalid_recipe_file() {
    assert!(Recipe::from_file("/nonexistent/recipe.toml").is_err());

    let file = write_recipe("[[param]]\nname = \"x\"\n");
    let err = Recipe::from_file(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to load recipe file"));
}
