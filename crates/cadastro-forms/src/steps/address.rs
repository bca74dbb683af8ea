// File: src/steps/address.rs
// Purpose: Address step: avatar upload and postal-code driven address fields

use super::{FieldView, StepView};
use crate::components::InputType;
use crate::config::LookupConfig;
use crate::enrichment::{AddressTargets, PostalCodeEnricher, StalePolicy};
use crate::path::FieldPath;
use crate::schema::{FieldSchema, FormSchema, Transform};
use crate::value::FileHandle;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const FORM_NAME: &str = "cadastro_endereco";

pub const AVATAR: &str = "endereco.avatar";
pub const CEP: &str = "endereco.cep";
pub const RUA: &str = "endereco.rua";
pub const BAIRRO: &str = "endereco.bairro";
pub const NUMERO: &str = "endereco.numero";
pub const LOCALIDADE: &str = "endereco.localidade";

static SCHEMA: Lazy<Arc<FormSchema>> = Lazy::new(|| {
    Arc::new(
        FormSchema::new(FORM_NAME)
            .field(
                AVATAR,
                FieldSchema::file_list().transform(Transform::FirstFile),
            )
            .field(
                CEP,
                FieldSchema::text()
                    .min_length(8, "O campo CEP é obrigatório")
                    .mask("99999-999"),
            )
            .field(RUA, FieldSchema::text().min_length(1, "O campo Rua é obrigatório"))
            .field(
                BAIRRO,
                FieldSchema::text().min_length(1, "O campo Bairro é obrigatório"),
            )
            .field(
                NUMERO,
                FieldSchema::number().min(1.0, "O campo Número é obrigatório"),
            )
            .field(
                LOCALIDADE,
                FieldSchema::text().min_length(1, "O campo Cidade é obrigatório"),
            ),
    )
});

pub fn schema() -> Arc<FormSchema> {
    Arc::clone(&SCHEMA)
}

/// Enricher wired to this step's postal-code and address fields
pub fn enricher(policy: StalePolicy) -> PostalCodeEnricher {
    PostalCodeEnricher::new(
        AddressTargets {
            postal_code: FieldPath::field(CEP),
            street: FieldPath::field(RUA),
            neighborhood: FieldPath::field(BAIRRO),
            locality: FieldPath::field(LOCALIDADE),
        },
        policy,
    )
}

/// Enricher using the stale-response policy from `[lookup]` configuration
pub fn enricher_for(config: &LookupConfig) -> PostalCodeEnricher {
    enricher(config.stale_responses)
}

pub fn view() -> StepView {
    StepView {
        title: "Para finalizar, só alguns detalhes!",
        fields: vec![
            FieldView {
                path: AVATAR,
                id: "campo-upload",
                label: "Sua foto",
                placeholder: "Clique para enviar",
                input: InputType::File,
            },
            FieldView {
                path: CEP,
                id: "campo-cep",
                label: "CEP",
                placeholder: "Insira seu CEP",
                input: InputType::Text,
            },
            FieldView {
                path: RUA,
                id: "campo-rua",
                label: "Rua",
                placeholder: "Rua Agarikov",
                input: InputType::Text,
            },
            FieldView {
                path: NUMERO,
                id: "campo-numero-rua",
                label: "Número",
                placeholder: "Ex: 1440",
                input: InputType::Text,
            },
            FieldView {
                path: BAIRRO,
                id: "campo-bairro",
                label: "Bairro",
                placeholder: "Vila Mariana",
                input: InputType::Text,
            },
            FieldView {
                path: LOCALIDADE,
                id: "campo-localidade",
                label: "Localidade",
                placeholder: "São Paulo, SP",
                input: InputType::Text,
            },
        ],
        groups: Vec::new(),
        submit_label: "Cadastrar",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressData {
    pub endereco: Endereco,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endereco {
    pub avatar: Option<FileHandle>,
    pub cep: String,
    pub rua: String,
    pub bairro: String,
    pub numero: f64,
    pub localidade: String,
}
