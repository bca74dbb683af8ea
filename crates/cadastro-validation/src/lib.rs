//! Cadastro Validation Core
//!
//! Pure validation functions shared by every registration step.
//! The schema layer in `cadastro-forms` composes these into declarative field rules.

pub mod collection;
pub mod email;
pub mod mask;
pub mod numeric;
pub mod string;
pub mod transform;

// Re-export all validators
pub use collection::*;
pub use email::*;
pub use mask::*;
pub use numeric::*;
pub use string::*;
pub use transform::*;
