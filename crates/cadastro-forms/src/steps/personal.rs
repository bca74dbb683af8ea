// File: src/steps/personal.rs
// Purpose: Personal data step: name, e-mail, phone and password with confirmation

use super::{FieldView, StepView};
use crate::components::InputType;
use crate::refine::CrossFieldRule;
use crate::schema::{FieldSchema, FormSchema, Transform};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const FORM_NAME: &str = "cadastro_pessoal";

static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(\d{2,3}\) \d{5}-\d{4}$").expect("phone pattern is valid"));

static SCHEMA: Lazy<Arc<FormSchema>> = Lazy::new(|| {
    Arc::new(
        FormSchema::new(FORM_NAME)
            .field(
                "nome",
                FieldSchema::text()
                    .min_length(5, "O campo nome é obrigatório")
                    .transform(Transform::TitleCase),
            )
            .field(
                "email",
                FieldSchema::text()
                    .min_length(1, "O campo e-mail é obrigatório")
                    .email("Digite um email válido")
                    .transform(Transform::Lowercase),
            )
            .field(
                "telefone",
                FieldSchema::text()
                    .min_length(1, "O campo telefone é obrigatório")
                    .pattern(PHONE.clone(), "O telefone inserido está no formato incorreto")
                    .mask("(99) 99999-9999"),
            )
            .field(
                "senha",
                FieldSchema::text().min_length(6, "A senha deve ter pelo menos 6 digitos"),
            )
            .field(
                "senhaVerificada",
                FieldSchema::text().min_length(1, "O campo deve ser preenchido"),
            )
            .rule(CrossFieldRule::fields_equal(
                "senha",
                "senhaVerificada",
                "As senhas devem ser iguais",
            )),
    )
});

pub fn schema() -> Arc<FormSchema> {
    Arc::clone(&SCHEMA)
}

pub fn view() -> StepView {
    StepView {
        title: "Insira alguns dados básicos:",
        fields: vec![
            FieldView {
                path: "nome",
                id: "campo-nome",
                label: "Nome",
                placeholder: "Digite seu nome completo",
                input: InputType::Text,
            },
            FieldView {
                path: "email",
                id: "campo-email",
                label: "E-mail",
                placeholder: "Insira seu endereço de email",
                input: InputType::Email,
            },
            FieldView {
                path: "telefone",
                id: "campo-telefone",
                label: "Telefone",
                placeholder: "Ex: (DD) XXXXX-XXXX",
                input: InputType::Text,
            },
            FieldView {
                path: "senha",
                id: "campo-senha",
                label: "Crie uma senha",
                placeholder: "Crie uma senha",
                input: InputType::Password,
            },
            FieldView {
                path: "senhaVerificada",
                id: "campo-senha-confirmacao",
                label: "Repita a senha",
                placeholder: "Repita a senha anterior",
                input: InputType::Password,
            },
        ],
        groups: Vec::new(),
        submit_label: "Avançar",
    }
}

/// Normalized personal data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalData {
    pub nome: String,
    pub email: String,
    pub telefone: String,
    pub senha: String,
    pub senha_verificada: String,
}
