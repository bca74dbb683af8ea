// File: src/steps/technical.rs
// Purpose: Technical step: professional registry number and a repeating list of specialties

use super::{FieldView, GroupView, StepView};
use crate::components::InputType;
use crate::schema::{FieldSchema, FormSchema, GroupSchema};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const FORM_NAME: &str = "cadastro_especialista_tecnico";
pub const ESPECIALIDADES: &str = "especialidades";

static SCHEMA: Lazy<Arc<FormSchema>> = Lazy::new(|| {
    Arc::new(
        FormSchema::new(FORM_NAME)
            .field("crm", FieldSchema::text().min_length(1, "O campo CRM é obrigatório"))
            .group(
                GroupSchema::new(ESPECIALIDADES)
                    .field(
                        "especialidade",
                        FieldSchema::text().min_length(1, "O campo especialidade é obrigatório"),
                    )
                    .field(
                        "anoConclusao",
                        FieldSchema::number()
                            .not_a_number("Preencha o ano de conclusão, somente numérico")
                            .min(1.0, "Preencha o ano de conclusão"),
                    )
                    .field(
                        "instituicao",
                        FieldSchema::text().min_length(1, "Preencha a instituição de ensino"),
                    ),
            ),
    )
});

pub fn schema() -> Arc<FormSchema> {
    Arc::clone(&SCHEMA)
}

pub fn view() -> StepView {
    StepView {
        title: "Agora, seus dados técnicos:",
        fields: vec![FieldView {
            path: "crm",
            id: "campo-crm",
            label: "CRM",
            placeholder: "Insira seu número de registro",
            input: InputType::Text,
        }],
        groups: vec![GroupView {
            group: ESPECIALIDADES,
            fields: vec![
                FieldView {
                    path: "especialidade",
                    id: "campo-especialidade",
                    label: "Especialidade",
                    placeholder: "Qual sua especialidade?",
                    input: InputType::Text,
                },
                FieldView {
                    path: "anoConclusao",
                    id: "campo-ano-conclusao",
                    label: "Ano de conclusão",
                    placeholder: "EX: 2005",
                    input: InputType::Text,
                },
                FieldView {
                    path: "instituicao",
                    id: "campo-instituicao-ensino",
                    label: "Instituição de ensino",
                    placeholder: "USP",
                    input: InputType::Text,
                },
            ],
            add_label: "Adicionar Especialidade",
        }],
        submit_label: "Avançar",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalData {
    pub crm: String,
    pub especialidades: Vec<Especialidade>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Especialidade {
    pub especialidade: String,
    pub ano_conclusao: f64,
    pub instituicao: String,
}
