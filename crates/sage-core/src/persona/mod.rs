//! Persona domain module.
//!
//! # Module Structure
//!
//! - `model`: `Persona` and the closed `PersonaKey` set
//! - `preset`: the built-in expert personas
//! - `catalog`: the read-only `PersonaCatalog`

mod catalog;
mod model;
mod preset;

pub use catalog::PersonaCatalog;
pub use model::{Persona, PersonaKey};
pub use preset::get_default_presets;
