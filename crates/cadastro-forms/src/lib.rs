// Cadastro Forms - specialist registration form engine
// Declarative field schemas, cross-field rules, postal-code enrichment and form sessions

pub mod components;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod path;
pub mod refine;
pub mod schema;
pub mod session;
pub mod steps;
pub mod submit;
pub mod validation;
pub mod value;
pub mod values;

// Re-export core types
pub use config::{Config, LookupConfig, ValidationConfig};
pub use enrichment::{
    AddressLookup, AddressTargets, EnrichmentOutcome, EnrichmentRecord, EnrichmentState,
    LookupTicket, PostalCodeEnricher, StalePolicy, UserNotice, ViaCepClient,
};
pub use error::{LookupError, PathError, SubmitError};
pub use path::FieldPath;
pub use refine::{CrossFieldRule, RuleOutcome};
pub use schema::{FieldKind, FieldSchema, FormSchema, GroupSchema, Transform};
pub use session::{FormSession, ValidationMode};
pub use steps::RegistrationStep;
pub use submit::{LoggingSubmitHandler, SubmitHandler, Submission};
pub use validation::{FormErrors, ValidationResult};
pub use value::{FieldValue, FileHandle};
pub use values::{FormValues, GroupEntry, NormalizedValues};
