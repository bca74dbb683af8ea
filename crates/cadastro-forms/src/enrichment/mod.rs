// File: src/enrichment/mod.rs
// Purpose: Postal-code driven address enrichment

pub mod lookup;
pub mod machine;
pub mod record;

pub use lookup::{AddressLookup, ViaCepClient};
pub use machine::{
    AddressTargets, EnrichmentOutcome, EnrichmentState, LookupTicket, PostalCodeEnricher,
    StalePolicy, UserNotice, POSTAL_CODE_PATTERN,
};
pub use record::EnrichmentRecord;
