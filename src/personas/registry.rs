//! Read-only persona registry.
//!
//! The registry is the process's single source of persona definitions. It is
//! constructed once (either explicitly via [`PersonaRegistry::builtin`] or
//! through the shared instance) and exposes no mutation: lookups borrow from
//! the fixed catalog.

use once_cell::sync::Lazy;

use super::{conservative, liberal, libertarian, moderate, progressive, Persona};
use crate::utilities::errors::SimulationError;

static BUILTIN: Lazy<PersonaRegistry> = Lazy::new(PersonaRegistry::builtin);

/// Immutable catalog of the five built-in personas.
#[derive(Debug, Clone)]
pub struct PersonaRegistry {
    personas: Vec<Persona>,
}

impl PersonaRegistry {
    /// Construct the built-in catalog in canonical order:
    /// Conservative, Libertarian, Moderate, Liberal, Progressive.
    pub fn builtin() -> Self {
        Self {
            personas: vec![
                conservative::persona(),
                libertarian::persona(),
                moderate::persona(),
                liberal::persona(),
                progressive::persona(),
            ],
        }
    }

    /// Process-wide shared instance, initialized on first use.
    pub fn shared() -> &'static PersonaRegistry {
        &BUILTIN
    }

    /// Look up a persona by id.
    pub fn get(&self, persona_id: &str) -> Result<&Persona, SimulationError> {
        self.personas
            .iter()
            .find(|p| p.id == persona_id)
            .ok_or_else(|| SimulationError::PersonaNotFound {
                persona_id: persona_id.to_string(),
            })
    }

    /// Whether the registry knows the given id.
    pub fn contains(&self, persona_id: &str) -> bool {
        self.personas.iter().any(|p| p.id == persona_id)
    }

    /// All personas in canonical order.
    pub fn list_all(&self) -> &[Persona] {
        &self.personas
    }
}
