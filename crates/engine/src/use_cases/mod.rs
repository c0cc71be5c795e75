//! Use cases - user stories orchestrated over the repository ports.

pub mod calculations;
pub mod management;

pub use calculations::{CalculationError, CharacterCalculations};
pub use management::{CharacterCrud, ManagementError, ManagementUseCases, NewCharacter};
