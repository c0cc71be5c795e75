//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::ports::{CharacterRepo, ClockPort};
use crate::use_cases;

/// Main application state.
///
/// Holds the repository ports and the use cases built on them.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
}

/// Container for repository ports.
pub struct Repositories {
    pub character: Arc<dyn CharacterRepo>,
}

/// Container for all use cases.
pub struct UseCases {
    pub management: use_cases::ManagementUseCases,
    pub calculations: use_cases::CharacterCalculations,
}

impl App {
    /// Wire use cases on top of the given storage and clock.
    pub fn new(character: Arc<dyn CharacterRepo>, clock: Arc<dyn ClockPort>) -> Self {
        let management = use_cases::ManagementUseCases::new(use_cases::CharacterCrud::new(
            character.clone(),
            clock.clone(),
        ));
        let calculations = use_cases::CharacterCalculations::new(character.clone(), clock);

        Self {
            repositories: Repositories { character },
            use_cases: UseCases {
                management,
                calculations,
            },
        }
    }
}
