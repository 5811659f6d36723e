//! Immutable persona catalog.

use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::Lazy;

use super::model::{Persona, PersonaKey};
use super::preset::get_default_presets;
use crate::error::{Result, SageError};

static BUILTIN: Lazy<Arc<PersonaCatalog>> = Lazy::new(|| {
    Arc::new(PersonaCatalog {
        personas: get_default_presets(),
    })
});

/// Read-only mapping from [`PersonaKey`] to [`Persona`].
///
/// Invariants, checked by [`PersonaCatalog::new`]:
/// - at least one persona
/// - keys are unique
/// - every instruction is non-blank
///
/// Declaration order is preserved and is the order of [`PersonaCatalog::keys`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaCatalog {
    personas: Vec<Persona>,
}

impl PersonaCatalog {
    /// Builds a catalog from the given personas, rejecting invalid sets.
    pub fn new(personas: Vec<Persona>) -> Result<Self> {
        if personas.is_empty() {
            return Err(SageError::config("persona catalog must not be empty"));
        }

        let mut seen = HashSet::new();
        for persona in &personas {
            if !seen.insert(persona.key) {
                return Err(SageError::config(format!(
                    "duplicate persona key '{}'",
                    persona.key
                )));
            }
            if persona.instruction.trim().is_empty() {
                return Err(SageError::config(format!(
                    "persona '{}' has an empty instruction",
                    persona.key
                )));
            }
        }

        Ok(Self { personas })
    }

    /// The built-in catalog, constructed once per process.
    pub fn builtin() -> Arc<PersonaCatalog> {
        Arc::clone(&BUILTIN)
    }

    pub fn lookup(&self, key: PersonaKey) -> Option<&Persona> {
        self.personas.iter().find(|persona| persona.key == key)
    }

    /// Parses `text` as a key and looks it up. Unknown text yields `None`.
    pub fn lookup_str(&self, text: &str) -> Option<&Persona> {
        PersonaKey::parse(text).and_then(|key| self.lookup(key))
    }

    pub fn keys(&self) -> Vec<PersonaKey> {
        self.personas.iter().map(|persona| persona.key).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Persona> {
        self.personas.iter()
    }
}
