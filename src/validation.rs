use crate::error::AppError;

/// Both fields are required, as the signup form marks them. Values are
/// otherwise passed on verbatim.
pub fn validate_signup(email: &str, activity: &str) -> Result<(), AppError> {
    validate_email(email)?;
    if activity.is_empty() {
        return Err(AppError::BadRequest("activity is required".into()));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), AppError> {
    if email.is_empty() {
        Err(AppError::BadRequest("email is required".into()))
    } else {
        Ok(())
    }
}
