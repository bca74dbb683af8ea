/// End-to-end behavior of the three registration steps
///
/// Each step is driven through a FormSession the way a user would:
/// field changes, group edits and submit.
use cadastro_forms::steps::{AddressData, PersonalData, TechnicalData};
use cadastro_forms::{
    FieldPath, FieldValue, FileHandle, LoggingSubmitHandler, RegistrationStep, SubmitError,
    ValidationConfig, ValidationResult,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

fn open(step: RegistrationStep) -> cadastro_forms::FormSession {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    step.open_session(&ValidationConfig::default())
}

fn fill_personal(session: &mut cadastro_forms::FormSession, senha: &str, confirmacao: &str) {
    session.set_field("nome", "maria DA silva").unwrap();
    session.set_field("email", "User@Example.COM").unwrap();
    session.set_field("telefone", "11912345678").unwrap();
    session.set_field("senha", senha).unwrap();
    session.set_field("senhaVerificada", confirmacao).unwrap();
}

#[test]
fn test_personal_step_normalizes_name_and_email() {
    let mut session = open(RegistrationStep::Personal);
    fill_personal(&mut session, "segredo", "segredo");

    // stored values stay as typed; normalization happens on the way out
    assert_eq!(session.value("nome"), Some(&FieldValue::from("maria DA silva")));
    assert_eq!(session.value("telefone"), Some(&FieldValue::from("(11) 91234-5678")));

    let data: PersonalData = session.submit_as().expect("valid personal data");
    assert_eq!(
        data,
        PersonalData {
            nome: "Maria Da Silva".to_string(),
            email: "user@example.com".to_string(),
            telefone: "(11) 91234-5678".to_string(),
            senha: "segredo".to_string(),
            senha_verificada: "segredo".to_string(),
        }
    );
}

#[rstest]
#[case("segredo", "segredo", true)]
#[case("segredo", "segredO", false)]
#[case("segredo", "", false)]
#[case("curta", "curta", false)]
#[case("123456", "123456", true)]
fn test_submit_requires_matching_passwords(
    #[case] senha: &str,
    #[case] confirmacao: &str,
    #[case] valid: bool,
) {
    let mut session = open(RegistrationStep::Personal);
    fill_personal(&mut session, senha, confirmacao);

    let submission = session.submit();
    assert_eq!(submission.is_valid(), valid);
}

#[test]
fn test_password_mismatch_reported_on_confirmation_only() {
    let mut session = open(RegistrationStep::Personal);
    fill_personal(&mut session, "segredo", "outro-segredo");

    let errors = session.submit().err().expect("mismatch blocks submit");
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors.first(&FieldPath::field("senhaVerificada")),
        Some("As senhas devem ser iguais")
    );
    assert!(!errors.has_error(&FieldPath::field("senha")));

    // editing the password, not the confirmation, clears the message
    session.set_field("senha", "outro-segredo").unwrap();
    assert_eq!(session.error("senhaVerificada"), None);
    assert!(session.is_valid());
}

#[test]
fn test_personal_field_messages() {
    let mut session = open(RegistrationStep::Personal);
    session.set_field("email", "").unwrap();
    session.set_field("telefone", "1191234").unwrap();
    session.set_field("senha", "123").unwrap();

    assert_eq!(session.error("email"), Some("O campo e-mail é obrigatório"));
    assert_eq!(
        session.error("telefone"),
        Some("O telefone inserido está no formato incorreto")
    );
    assert_eq!(session.error("senha"), Some("A senha deve ter pelo menos 6 digitos"));

    session.set_field("email", "not-an-email").unwrap();
    assert_eq!(session.error("email"), Some("Digite um email válido"));
}

#[rstest]
#[case("abc", Err("Preencha o ano de conclusão, somente numérico"))]
#[case("0", Err("Preencha o ano de conclusão"))]
#[case("", Err("Preencha o ano de conclusão"))]
#[case("2005", Ok(2005.0))]
fn test_ano_conclusao_coercion(#[case] input: &str, #[case] expected: Result<f64, &str>) {
    let mut session = open(RegistrationStep::Technical);
    session.add_group_entry("especialidades").unwrap();
    session.set_field("especialidades.0.anoConclusao", input).unwrap();

    let result = session.validate_field("especialidades.0.anoConclusao").unwrap();
    match expected {
        Ok(n) => assert_eq!(result, ValidationResult::Valid(FieldValue::Number(n))),
        Err(message) => {
            assert_eq!(result.message(), Some(message));
            assert_eq!(session.error("especialidades.0.anoConclusao"), Some(message));
        }
    }
}

#[test]
fn test_add_entry_starts_with_defaults() {
    let mut session = open(RegistrationStep::Technical);
    assert_eq!(session.group_len("especialidades"), 0);

    let index = session.add_group_entry("especialidades").unwrap();
    assert_eq!(index, 0);
    assert_eq!(session.group_len("especialidades"), 1);
    assert_eq!(
        session.value("especialidades.0.especialidade"),
        Some(&FieldValue::from(""))
    );
    assert_eq!(
        session.value("especialidades.0.anoConclusao"),
        Some(&FieldValue::Number(0.0))
    );
    assert_eq!(
        session.value("especialidades.0.instituicao"),
        Some(&FieldValue::from(""))
    );
    assert!(session.error("especialidades.0.instituicao").is_none());
}

#[test]
fn test_remove_entry_reindexes_errors() {
    let mut session = open(RegistrationStep::Technical);
    for _ in 0..3 {
        session.add_group_entry("especialidades").unwrap();
    }
    let keys = session.group_keys("especialidades");

    session.set_field("especialidades.0.instituicao", "").unwrap();
    session.set_field("especialidades.2.anoConclusao", "abc").unwrap();
    session.set_field("especialidades.2.instituicao", "USP").unwrap();

    session.remove_group_entry("especialidades", 1).unwrap();

    assert_eq!(session.group_len("especialidades"), 2);
    assert_eq!(session.group_keys("especialidades"), vec![keys[0], keys[2]]);
    assert_eq!(
        session.error("especialidades.0.instituicao"),
        Some("Preencha a instituição de ensino")
    );
    assert_eq!(
        session.error("especialidades.1.anoConclusao"),
        Some("Preencha o ano de conclusão, somente numérico")
    );
    assert_eq!(session.error("especialidades.2.anoConclusao"), None);
    assert_eq!(
        session.value("especialidades.1.instituicao"),
        Some(&FieldValue::from("USP"))
    );
    assert!(session.is_touched("especialidades.1.instituicao"));
    assert!(!session.is_touched("especialidades.2.instituicao"));
}

#[test]
fn test_technical_submit() {
    let mut session = open(RegistrationStep::Technical);
    session.set_field("crm", "123456-SP").unwrap();
    session.add_group_entry("especialidades").unwrap();
    session.set_field("especialidades.0.especialidade", "Cardiologia").unwrap();
    session.set_field("especialidades.0.anoConclusao", "2005").unwrap();
    session.set_field("especialidades.0.instituicao", "USP").unwrap();

    let submission = session.submit_with(&LoggingSubmitHandler);
    let values = submission.ok().expect("valid technical data");
    assert_eq!(
        values.as_json(),
        &json!({
            "crm": "123456-SP",
            "especialidades": [
                {"especialidade": "Cardiologia", "anoConclusao": 2005, "instituicao": "USP"}
            ]
        })
    );

    let data: TechnicalData = values.deserialize().unwrap();
    assert_eq!(data.especialidades[0].ano_conclusao, 2005.0);
}

#[test]
fn test_technical_submit_collects_every_entry_error() {
    let mut session = open(RegistrationStep::Technical);
    session.add_group_entry("especialidades").unwrap();

    match session.submit_as::<TechnicalData>() {
        Err(SubmitError::Invalid(errors)) => {
            let flat = errors.to_flat_map();
            assert_eq!(flat.get("crm").map(String::as_str), Some("O campo CRM é obrigatório"));
            assert_eq!(
                flat.get("especialidades.0.especialidade").map(String::as_str),
                Some("O campo especialidade é obrigatório")
            );
            assert_eq!(
                flat.get("especialidades.0.anoConclusao").map(String::as_str),
                Some("Preencha o ano de conclusão")
            );
            assert_eq!(flat.len(), 4);
        }
        other => panic!("expected invalid submission, got {:?}", other.map(|_| ())),
    }
    assert_eq!(session.error("crm"), Some("O campo CRM é obrigatório"));
}

#[test]
fn test_address_submit_without_upload() {
    let mut session = open(RegistrationStep::Address);
    session.set_field("endereco.cep", "01001000").unwrap();
    session.set_field("endereco.rua", "Praça da Sé").unwrap();
    session.set_field("endereco.numero", "1440").unwrap();
    session.set_field("endereco.bairro", "Sé").unwrap();
    session.set_field("endereco.localidade", "São Paulo, SP").unwrap();

    let data: AddressData = session.submit_as().expect("valid address");
    assert_eq!(data.endereco.cep, "01001-000");
    assert_eq!(data.endereco.numero, 1440.0);
    assert_eq!(data.endereco.avatar, None);
    assert_eq!(session.value("endereco.avatar"), Some(&FieldValue::Files(Vec::new())));
}

#[test]
fn test_address_avatar_keeps_first_upload() {
    let mut session = open(RegistrationStep::Address);
    session
        .set_field(
            "endereco.avatar",
            vec![
                FileHandle::new("eu.jpg", "image/jpeg").with_size(2048),
                FileHandle::new("outra.jpg", "image/jpeg"),
            ],
        )
        .unwrap();

    assert_eq!(
        session.validate_field("endereco.avatar").unwrap(),
        ValidationResult::Valid(FieldValue::File(
            FileHandle::new("eu.jpg", "image/jpeg").with_size(2048)
        ))
    );
}

#[test]
fn test_address_required_messages() {
    let mut session = open(RegistrationStep::Address);
    let errors = session.submit().err().expect("empty address is invalid");
    let flat = errors.to_flat_map();

    assert_eq!(flat.get("endereco.cep").map(String::as_str), Some("O campo CEP é obrigatório"));
    assert_eq!(flat.get("endereco.rua").map(String::as_str), Some("O campo Rua é obrigatório"));
    assert_eq!(flat.get("endereco.numero").map(String::as_str), Some("O campo Número é obrigatório"));
    assert_eq!(flat.get("endereco.localidade").map(String::as_str), Some("O campo Cidade é obrigatório"));
    assert!(!flat.contains_key("endereco.avatar"));
}
