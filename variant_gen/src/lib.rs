//! Generate question variants from TOML recipes.
//!
//! - `config` - recipe structures loaded with serde/toml
//! - `generate` - sample a recipe into a JSON-ready variant

pub mod config;
pub mod generate;

pub use config::{ParamKind, ParamSpec, Recipe, SystemSpec};
pub use generate::{generate_variant, GivenSelection, Variant};
