//! Account management commands.
//!
//! # Usage
//!
//! ```bash
//! todo-cli user create -u alice -p 'correct horse battery'
//! ```

use todo_app_web::db::PgStore;
use todo_app_web::services::AuthService;

use super::{CommandError, connect};

/// Create a password account.
///
/// # Returns
///
/// The ID of the created user.
///
/// # Errors
///
/// Returns an error if the name or password is rejected, the name is taken,
/// or the database is unreachable.
pub async fn create(user_name: &str, password: &str) -> Result<String, CommandError> {
    let store = PgStore::new(connect().await?);

    tracing::info!("Creating user: {}", user_name);
    let user = AuthService::new(&store).register(user_name, password).await?;

    tracing::info!("User created with ID: {}", user.id);
    Ok(user.id.to_string())
}
