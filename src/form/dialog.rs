use crate::domain::Editable;
use crate::form::{FormValues, Validated, ValidationError};
use tracing::debug;

/// Create/edit form for one record.
///
/// The dialog validates input and produces a typed payload. Calling the backend is left to the
/// owning list controller.
#[derive(Debug, Clone, PartialEq)]
pub struct FormDialog<R> {
    initial: Option<R>,
    values: FormValues,
    error: Option<String>,
}

impl<R: Editable> FormDialog<R> {
    pub fn new(initial: Option<R>) -> Self {
        let values = Self::initial_values(initial.as_ref());
        FormDialog {
            initial,
            values,
            error: None,
        }
    }

    /// Re-initializes from another record, dropping input and any error.
    pub fn reset(&mut self, initial: Option<R>) {
        self.values = Self::initial_values(initial.as_ref());
        self.initial = initial;
        self.error = None;
    }

    fn initial_values(initial: Option<&R>) -> FormValues {
        match initial {
            Some(record) => record.form_values(),
            None => FormValues::defaults(R::FIELDS),
        }
    }

    pub fn title(&self) -> String {
        match self.initial {
            Some(_) => format!("Edit {}", R::SCHEMA.label),
            None => format!("Create {}", R::SCHEMA.label),
        }
    }

    pub fn initial(&self) -> Option<&R> {
        self.initial.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.initial.is_some()
    }

    pub fn value(&self, field: &str) -> &str {
        self.values.get(field)
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.values.set(field, value);
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn validate(&self) -> Result<R::Payload, ValidationError> {
        Validated::from_values(R::FIELDS, &self.values).map(|validated| R::payload(&validated))
    }

    /// Validates the input, keeping the message of a rejection for display.
    pub fn submit(&mut self) -> Result<R::Payload, ValidationError> {
        let result = self.validate();
        match &result {
            Ok(_) => self.error = None,
            Err(error) => {
                debug!(resource = R::SCHEMA.path, field = error.field, "📝 Rejected form input: {}", error);
                self.error = Some(error.message.clone());
            }
        }
        result
    }
}
