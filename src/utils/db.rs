use solvex_core::AppError;

pub const EMAIL_TAKEN: &str = "email already registered";

/// Maps a write failure on an account table, turning the live-email unique
/// index into a 400.
pub fn map_email_conflict(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return AppError::bad_request(anyhow::anyhow!(EMAIL_TAKEN));
    }
    AppError::database(anyhow::Error::from(e))
}
