// File: src/components.rs
// Purpose: Stateless form primitives rendered with Maud, configured by props structs

use crate::path::FieldPath;
use crate::session::FormSession;
use crate::steps::{FieldView, RegistrationStep};
use maud::{html, Markup};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Text,
    Email,
    Password,
    File,
}

impl InputType {
    pub fn as_str(self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Email => "email",
            InputType::Password => "password",
            InputType::File => "file",
        }
    }
}

/// Configuration of a labeled input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputProps<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub label: &'a str,
    pub placeholder: &'a str,
    pub input: InputType,
    pub value: &'a str,
    pub error: Option<&'a str>,
    /// Endpoint notified on every change (`hx-post`)
    pub on_change: Option<&'a str>,
    pub mask: Option<&'a str>,
}

impl<'a> InputProps<'a> {
    pub fn new(id: &'a str, name: &'a str, label: &'a str) -> Self {
        Self {
            id,
            name,
            label,
            placeholder: "",
            input: InputType::Text,
            value: "",
            error: None,
            on_change: None,
            mask: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    Submit,
    Button,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonVariant {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonProps<'a> {
    pub label: &'a str,
    pub kind: ButtonKind,
    pub variant: ButtonVariant,
    pub on_click: Option<&'a str>,
}

/// Label, input and inline error message
pub fn fieldset(props: &InputProps) -> Markup {
    let is_file = props.input == InputType::File;
    html! {
        fieldset.fieldset {
            label for=(props.id) { (props.label) }
            @if is_file {
                input.error[props.error.is_some()]
                    id=(props.id) name=(props.name) type="file" accept="image/*"
                    hx-post=[props.on_change];
            } @else {
                input.error[props.error.is_some()]
                    id=(props.id) name=(props.name) type=(props.input.as_str())
                    placeholder=(props.placeholder) value=(props.value)
                    data-mask=[props.mask]
                    hx-post=[props.on_change]
                    hx-trigger=[props.on_change.map(|_| "input changed")];
            }
            @if let Some(message) = props.error {
                span.error-message { (message) }
            }
        }
    }
}

pub fn button(props: &ButtonProps) -> Markup {
    let kind = match props.kind {
        ButtonKind::Submit => "submit",
        ButtonKind::Button => "button",
    };
    html! {
        button.secundario[props.variant == ButtonVariant::Secondary]
            type=(kind)
            hx-post=[props.on_click] {
            (props.label)
        }
    }
}

fn render_field(
    session: &FormSession,
    view: &FieldView,
    path: &FieldPath,
    endpoint: Option<&str>,
) -> Markup {
    let name = path.to_string();
    let on_change = endpoint.map(|base| format!("{}/{}", base, name));
    let value = session.value_at(path).map(|v| v.display()).unwrap_or_default();
    fieldset(&InputProps {
        id: view.id,
        name: &name,
        label: view.label,
        placeholder: view.placeholder,
        input: view.input,
        value: &value,
        error: session.error_at(path),
        on_change: on_change.as_deref(),
        mask: session.schema().field_schema(path).and_then(|f| f.input_mask()),
    })
}

/// Whole step: title, inputs with current values and errors, group rows, buttons.
///
/// With an `endpoint`, the form posts to it, each input posts changes to
/// `{endpoint}/{field path}` and each group's add button to `{endpoint}/{group}/add`.
pub fn render_step(
    step: RegistrationStep,
    session: &FormSession,
    endpoint: Option<&str>,
) -> Markup {
    let view = step.view();
    html! {
        h1.titulo { (view.title) }
        form data-form=(step.name()) hx-post=[endpoint] {
            @for field in &view.fields {
                (render_field(session, field, &FieldPath::Field(field.path.to_string()), endpoint))
            }
            @for group in &view.groups {
                hr.divisor;
                @for (index, key) in session.group_keys(group.group).iter().enumerate() {
                    div data-key=(key.to_string()) {
                        @for field in &group.fields {
                            (render_field(session, field, &FieldPath::entry(group.group, index, field.path), endpoint))
                        }
                    }
                }
                hr.divisor;
                @let add = endpoint.map(|base| format!("{}/{}/add", base, group.group));
                (button(&ButtonProps {
                    label: group.add_label,
                    kind: ButtonKind::Button,
                    variant: ButtonVariant::Secondary,
                    on_click: add.as_deref(),
                }))
            }
            (button(&ButtonProps {
                label: view.submit_label,
                kind: ButtonKind::Submit,
                variant: ButtonVariant::Primary,
                on_click: None,
            }))
        }
    }
}
