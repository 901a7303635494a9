//! sqlx 错误映射

use taproom_errors::AppError;
use tracing::error;

/// PostgreSQL 唯一约束冲突
const UNIQUE_VIOLATION: &str = "23505";

/// 把 sqlx 错误转换为 `AppError`
///
/// 唯一约束冲突映射为 `Conflict`，其余映射为 `Database`
pub fn map_sqlx_error(context: &str, err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return AppError::conflict(format!("{}: {}", context, db_err.message()));
        }
    }

    error!(context, error = %err, "Database operation failed");
    AppError::database(format!("{}: {}", context, err))
}
