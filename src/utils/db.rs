use sea_orm::{DbErr, SqlErr};

/// True when the error chain carries a unique constraint violation from the database.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<DbErr>())
        .any(|db_err| matches!(db_err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))))
}
