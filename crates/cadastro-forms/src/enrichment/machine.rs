// File: src/enrichment/machine.rs
// Purpose: Idle -> Fetching -> Applying -> Idle state machine over the postal-code field

use super::lookup::AddressLookup;
use super::record::EnrichmentRecord;
use crate::error::{LookupError, PathError};
use crate::path::FieldPath;
use crate::session::FormSession;
use crate::value::FieldValue;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Only complete, masked codes such as `01001-000` trigger a lookup
pub const POSTAL_CODE_PATTERN: &str = r"^\d{5}-\d{3}$";

static POSTAL_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(POSTAL_CODE_PATTERN).expect("postal code pattern is valid"));

const NOT_FOUND_NOTICE: &str = "Cep inválido";

/// What to do with a response that arrives after a newer lookup was issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalePolicy {
    /// Drop it; only the newest lookup may write fields
    #[default]
    Discard,
    /// Apply it anyway (last response wins)
    Apply,
}

/// Identifies one issued lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    id: u64,
    postal_code: String,
}

impl LookupTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentState {
    Idle,
    /// Waiting on the newest issued lookup
    Fetching(LookupTicket),
    Applying,
}

/// Blocking message the UI must show before the user continues
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserNotice {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentOutcome {
    /// Value does not look like a complete postal code; nothing was requested
    Skipped,
    /// Record applied; lists the fields written
    Applied { ticket: u64, fields: Vec<FieldPath> },
    /// Service has no address for the code; fields untouched
    NotFound(UserNotice),
    /// Transport or decode failure, logged only
    Failed,
    /// Superseded by a newer lookup and discarded
    Stale { ticket: u64 },
}

/// Fields read and written by the enricher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressTargets {
    pub postal_code: FieldPath,
    pub street: FieldPath,
    pub neighborhood: FieldPath,
    pub locality: FieldPath,
}

/// Drives address autofill for one form session
#[derive(Debug, Clone)]
pub struct PostalCodeEnricher {
    targets: AddressTargets,
    policy: StalePolicy,
    state: EnrichmentState,
    issued: u64,
}

impl PostalCodeEnricher {
    pub fn new(targets: AddressTargets, policy: StalePolicy) -> Self {
        Self {
            targets,
            policy,
            state: EnrichmentState::Idle,
            issued: 0,
        }
    }

    pub fn state(&self) -> &EnrichmentState {
        &self.state
    }

    pub fn targets(&self) -> &AddressTargets {
        &self.targets
    }

    /// Issue a ticket when `value` is a complete postal code
    pub fn begin(&mut self, value: &str) -> Option<LookupTicket> {
        if !POSTAL_CODE.is_match(value) {
            return None;
        }

        self.issued += 1;
        let ticket = LookupTicket {
            id: self.issued,
            postal_code: value.to_string(),
        };
        debug!(cep = %value, ticket = ticket.id, "address lookup issued");
        self.state = EnrichmentState::Fetching(ticket.clone());
        Some(ticket)
    }

    /// Handle the response of a lookup issued by `begin`
    pub fn finish(
        &mut self,
        session: &mut FormSession,
        ticket: &LookupTicket,
        response: Result<EnrichmentRecord, LookupError>,
    ) -> EnrichmentOutcome {
        let latest = ticket.id == self.issued;
        if !latest {
            match self.policy {
                StalePolicy::Discard => {
                    debug!(
                        cep = %ticket.postal_code,
                        ticket = ticket.id,
                        newest = self.issued,
                        "discarding stale address response"
                    );
                    return EnrichmentOutcome::Stale { ticket: ticket.id };
                }
                StalePolicy::Apply => {
                    debug!(cep = %ticket.postal_code, ticket = ticket.id, "applying stale address response");
                }
            }
        }

        let outcome = match response {
            Ok(record) if record.is_not_found() => {
                info!(cep = %ticket.postal_code, "postal code not found");
                EnrichmentOutcome::NotFound(UserNotice {
                    message: NOT_FOUND_NOTICE.to_string(),
                })
            }
            Ok(record) => {
                if latest {
                    self.state = EnrichmentState::Applying;
                }
                let fields = self.apply(session, &record);
                EnrichmentOutcome::Applied {
                    ticket: ticket.id,
                    fields,
                }
            }
            Err(err) => {
                warn!(cep = %ticket.postal_code, error = %err, "address lookup failed");
                EnrichmentOutcome::Failed
            }
        };

        if latest {
            self.state = EnrichmentState::Idle;
        }
        outcome
    }

    /// Read the postal code from the session and enrich it if it is complete
    pub async fn on_change<L>(&mut self, session: &mut FormSession, lookup: &L) -> EnrichmentOutcome
    where
        L: AddressLookup + ?Sized,
    {
        let value = session
            .value_at(&self.targets.postal_code)
            .map(FieldValue::display)
            .unwrap_or_default();

        let Some(ticket) = self.begin(&value) else {
            return EnrichmentOutcome::Skipped;
        };

        let response = lookup.lookup(ticket.postal_code()).await;
        self.finish(session, &ticket, response)
    }

    /// Store user input in the postal-code field, then enrich
    pub async fn change_postal_code<L>(
        &mut self,
        session: &mut FormSession,
        raw: &str,
        lookup: &L,
    ) -> Result<EnrichmentOutcome, PathError>
    where
        L: AddressLookup + ?Sized,
    {
        session.set_field_at(&self.targets.postal_code, raw.into())?;
        Ok(self.on_change(session, lookup).await)
    }

    /// Overwrite street, neighborhood and locality; they stay ordinary editable values
    fn apply(&self, session: &mut FormSession, record: &EnrichmentRecord) -> Vec<FieldPath> {
        let writes = [
            (&self.targets.street, record.street().to_string()),
            (&self.targets.neighborhood, record.neighborhood().to_string()),
            (&self.targets.locality, record.locality()),
        ];

        let mut written = Vec::with_capacity(writes.len());
        for (path, value) in writes {
            match session.set_field_at(path, FieldValue::Text(value)) {
                Ok(()) => written.push(path.clone()),
                Err(err) => warn!(field = %path, error = %err, "could not apply address field"),
            }
        }
        written
    }
}
