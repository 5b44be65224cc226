use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {operation} failed: {source}")]
    Operation {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("Unique constraint violated during {operation}: {constraint}")]
    UniqueViolation {
        operation: String,
        /// `table.column` as reported by the store
        constraint: String,
    },

    #[error("Foreign key constraint violated during {operation}: {detail}")]
    ForeignKeyViolation {
        operation: String,
        detail: String,
    },

    #[error("Starting transaction failed: {source}")]
    TransactionBegin {
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("Committing transaction failed: {source}")]
    TransactionCommit {
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("Rolling back transaction failed: {source}")]
    TransactionRollback {
        #[source]
        source: sea_orm::DbErr,
    },
}
