use konsul_core::errors::StorageError;

/// Translates a sqlx error into the storage taxonomy used by business logic.
///
/// Unique violations are recognised from the driver's error kind, never from
/// the message text, so the mapping holds across Postgres versions and locales.
pub fn classify(err: sqlx::Error) -> StorageError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StorageError::DuplicateKey {
                constraint: db_err.constraint().map(str::to_owned),
            };
        }
    }

    StorageError::Database(eyre::Report::new(err))
}
