//! Data models for the admin API.
//!
//! - [`envelope`]: the `{success, data, message}` wrapper and its decoder
//! - [`meal_type`]: breakfast/lunch/dinner with tolerant parsing
//! - [`wire`]: typed records for endpoints with a stable shape
//! - [`lenient`]: serde helpers that repair bad scalar fields instead of failing

pub mod envelope;
pub mod lenient;
pub mod meal_type;
pub mod wire;

pub use envelope::{decode_data, decode_records, ApiResponse};
pub use meal_type::MealType;
pub use wire::*;
