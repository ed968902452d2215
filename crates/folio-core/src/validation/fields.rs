//! Required form fields.

use validator::Validate;

use crate::config::RequiredFields;
use crate::models::PortfolioDraft;

/// Names of the required draft fields that are empty, in form order.
pub fn missing_required_fields(
    draft: &PortfolioDraft,
    required: RequiredFields,
) -> Vec<&'static str> {
    let errors = match draft.validate() {
        Ok(()) => return Vec::new(),
        Err(errors) => errors,
    };
    let failed = errors.field_errors();

    required
        .fields()
        .iter()
        .copied()
        .filter(|field| failed.contains_key(*field))
        .collect()
}
