mod dialog;
mod field;

pub use dialog::FormDialog;
pub use field::{Field, FieldKind, FieldValue, FormValues, Validated, ValidationError};
