use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Required, non-empty after trimming.
    Text,
    /// Finite number greater than zero.
    PositiveNumber,
    /// One of a fixed set of options.
    Choice(&'static [&'static str]),
}

/// One editable input of a resource form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub default: &'static str,
    /// Shown when the value is rejected.
    pub message: &'static str,
}

impl Field {
    pub const fn text(name: &'static str, label: &'static str, message: &'static str) -> Self {
        Field {
            name,
            label,
            kind: FieldKind::Text,
            default: "",
            message,
        }
    }

    pub const fn positive_number(name: &'static str, label: &'static str, message: &'static str) -> Self {
        Field {
            name,
            label,
            kind: FieldKind::PositiveNumber,
            default: "",
            message,
        }
    }

    pub const fn choice(
        name: &'static str,
        label: &'static str,
        options: &'static [&'static str],
        default: &'static str,
        message: &'static str,
    ) -> Self {
        Field {
            name,
            label,
            kind: FieldKind::Choice(options),
            default,
            message,
        }
    }

    pub fn validate(&self, raw: &str) -> Result<FieldValue, ValidationError> {
        let trimmed = raw.trim();
        match self.kind {
            FieldKind::Text if trimmed.is_empty() => Err(self.rejected()),
            FieldKind::Text => Ok(FieldValue::Text(trimmed.to_string())),
            FieldKind::PositiveNumber => match trimmed.parse::<f64>() {
                Ok(number) if number.is_finite() && number > 0.0 => Ok(FieldValue::Number(number)),
                _ => Err(self.rejected()),
            },
            FieldKind::Choice(options) if options.contains(&trimmed) => Ok(FieldValue::Text(trimmed.to_string())),
            FieldKind::Choice(_) => Err(self.rejected()),
        }
    }

    fn rejected(&self) -> ValidationError {
        ValidationError {
            field: self.name,
            message: self.message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

/// Raw, unvalidated input keyed by field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    pub fn new() -> Self {
        FormValues(BTreeMap::new())
    }

    pub fn defaults(fields: &[Field]) -> Self {
        fields.iter().fold(FormValues::new(), |values, field| values.with(field.name, field.default))
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or("")
    }
}

/// Trimmed, typed values of a form that passed validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Validated(BTreeMap<&'static str, FieldValue>);

impl Validated {
    pub fn from_values(fields: &[Field], values: &FormValues) -> Result<Self, ValidationError> {
        let mut validated = BTreeMap::new();
        for field in fields {
            validated.insert(field.name, field.validate(values.get(field.name))?);
        }
        Ok(Validated(validated))
    }

    pub fn text(&self, name: &str) -> String {
        match self.0.get(name) {
            Some(FieldValue::Text(text)) => text.clone(),
            Some(FieldValue::Number(number)) => number.to_string(),
            None => String::new(),
        }
    }

    pub fn number(&self, name: &str) -> f64 {
        match self.0.get(name) {
            Some(FieldValue::Number(number)) => *number,
            Some(FieldValue::Text(text)) => text.parse().unwrap_or_default(),
            None => 0.0,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const NAME: Field = Field::text("nome", "Name", "Name is required.");
    const CAPACITY: Field = Field::positive_number("capacidadeMaxima", "Maximum capacity", "Capacity must be a positive number.");
    const STATUS: Field = Field::choice("status", "Status", &["ATIVO", "INATIVO"], "ATIVO", "Pick a valid status.");

    #[rstest]
    #[case::plain("Central", Ok(FieldValue::Text("Central".to_string())))]
    #[case::padded("  Central ", Ok(FieldValue::Text("Central".to_string())))]
    #[case::empty("", Err(()))]
    #[case::blank("   ", Err(()))]
    fn validates_text(#[case] raw: &str, #[case] expected: Result<FieldValue, ()>) {
        assert_eq!(NAME.validate(raw).map_err(|_| ()), expected);
    }

    #[rstest]
    #[case::integer("5000", Ok(FieldValue::Number(5000.0)))]
    #[case::decimal(" 12.5 ", Ok(FieldValue::Number(12.5)))]
    #[case::zero("0", Err(()))]
    #[case::negative("-10", Err(()))]
    #[case::not_a_number("abc", Err(()))]
    #[case::empty("", Err(()))]
    #[case::infinite("inf", Err(()))]
    #[case::nan("NaN", Err(()))]
    fn validates_positive_numbers(#[case] raw: &str, #[case] expected: Result<FieldValue, ()>) {
        assert_eq!(CAPACITY.validate(raw).map_err(|_| ()), expected);
    }

    #[rstest]
    #[case::known("INATIVO", true)]
    #[case::unknown("MAYBE", false)]
    #[case::empty("", false)]
    fn validates_choices(#[case] raw: &str, #[case] valid: bool) {
        assert_eq!(STATUS.validate(raw).is_ok(), valid);
    }

    #[test]
    fn reports_the_first_failing_field() {
        let values = FormValues::new().with("nome", " ").with("capacidadeMaxima", "-1");

        let error = Validated::from_values(&[NAME, CAPACITY], &values).unwrap_err();

        assert_eq!(
            error,
            ValidationError {
                field: "nome",
                message: "Name is required.".to_string()
            }
        );
    }

    #[test]
    fn defaults_use_the_field_defaults() {
        let values = FormValues::defaults(&[NAME, STATUS]);

        assert_eq!(values.get("nome"), "");
        assert_eq!(values.get("status"), "ATIVO");
    }

    #[test]
    fn validated_values_are_trimmed_and_typed() {
        let values = FormValues::new().with("nome", " Central ").with("capacidadeMaxima", "5000").with("status", "ATIVO");

        let validated = Validated::from_values(&[NAME, CAPACITY, STATUS], &values).unwrap();

        assert_eq!(validated.text("nome"), "Central");
        assert_eq!(validated.number("capacidadeMaxima"), 5000.0);
        assert_eq!(validated.text("status"), "ATIVO");
    }
}
