use thiserror::Error;

/// Why a selected file may not be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a CSV file")]
    NotCsv,
}

/// Accept a file for submission iff its name ends in `.csv`.
///
/// The check is case-sensitive and never looks at the content; the
/// service is the judge of whether the data itself is usable.
pub fn validate(file_name: &str) -> Result<(), ValidationError> {
    if file_name.ends_with(".csv") {
        Ok(())
    } else {
        Err(ValidationError::NotCsv)
    }
}
