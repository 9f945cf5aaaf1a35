//! Request payloads of the HTML-style forms, with their field descriptors and
//! the validation that does not need the database.

pub mod admin;
pub mod login;
pub mod register;
pub mod update;

pub use admin::*;
pub use login::*;
pub use register::*;
pub use update::*;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Describes one input so a client can render the form.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub input_type: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autocomplete: Option<String>,
}

impl FormField {
    pub fn text(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            input_type: "text".to_string(),
            required: true,
            max_length: None,
            placeholder: None,
            autocomplete: None,
        }
    }

    pub fn password(name: &str, label: &str) -> Self {
        Self {
            input_type: "password".to_string(),
            ..Self::text(name, label)
        }
    }

    pub fn checkbox(name: &str, label: &str) -> Self {
        Self {
            input_type: "checkbox".to_string(),
            required: false,
            ..Self::text(name, label)
        }
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn autocomplete(mut self, autocomplete: &str) -> Self {
        self.autocomplete = Some(autocomplete.to_string());
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// Blank submissions count as "not supplied".
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
