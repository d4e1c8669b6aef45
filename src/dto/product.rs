use crate::entities::ProductActiveModel;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Write payload for creating or replacing a product.
///
/// Both fields are optional at the serde level so that a missing field is
/// reported as a field error rather than a deserialization failure. Any `id`
/// sent by the client is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProductInput {
    #[validate(required, custom = "validate_not_blank")]
    #[schema(example = "Widget")]
    pub name: Option<String>,

    /// Accepts a JSON number or a numeric string; every digit is kept.
    #[validate(required)]
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    #[schema(value_type = f64, example = 9.99)]
    pub value: Option<Decimal>,
}

pub(crate) const BLANK_MESSAGE: &str = "must not be blank";
pub(crate) const NULL_MESSAGE: &str = "must not be null";

fn validate_not_blank(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("not_blank");
        err.message = Some(BLANK_MESSAGE.into());
        return Err(err);
    }
    Ok(())
}

/// Message reported when a required field is absent or null
pub(crate) fn missing_field_message(field: &str) -> &'static str {
    match field {
        "name" => BLANK_MESSAGE,
        _ => NULL_MESSAGE,
    }
}

impl ProductInput {
    pub fn new(name: impl Into<String>, value: Decimal) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value),
        }
    }

    /// Copies `name` and `value` onto `product`. The identifier is never touched.
    pub fn apply_to(self, product: &mut ProductActiveModel) {
        if let Some(name) = self.name {
            product.name = Set(name);
        }
        if let Some(value) = self.value {
            product.value = Set(value);
        }
    }
}
