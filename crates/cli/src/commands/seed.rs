//! Demo data for local development.
//!
//! # Usage
//!
//! ```bash
//! todo-cli seed demo -u alice
//! ```

use todo_app_core::{ItemStatus, UserName};
use todo_app_web::db::{PgStore, UserRepository};
use todo_app_web::models::{ItemFields, ListFields};
use todo_app_web::services::{ItemAccessService, ListAccessService};

use super::{CommandError, connect};

const DEMO_ITEMS: &[(&str, &str, &str)] = &[
    ("Milk", "2 litres, semi-skimmed", "new"),
    ("Bread", "Sourdough if they have it", "new"),
    ("Coffee", "Whole beans", "done"),
];

/// Create a "Groceries" list with a few items for an existing user.
///
/// # Errors
///
/// Returns an error if the user does not exist or the database is unreachable.
pub async fn demo(user_name: &str) -> Result<(), CommandError> {
    let user_name = UserName::parse(user_name)
        .map_err(|e| CommandError::InvalidArgument(e.to_string()))?;

    let pool = connect().await?;
    let user = UserRepository::new(&pool)
        .get_by_user_name(&user_name)
        .await?
        .ok_or_else(|| CommandError::InvalidArgument(format!("no such user: {user_name}")))?;

    let store = PgStore::new(pool);
    let list = ListAccessService::new(&store)
        .create_list(
            &user.id,
            ListFields {
                name: "Groceries".to_string(),
                description: "Weekly shop".to_string(),
            },
        )
        .await?;
    tracing::info!(list_id = %list.id, "Created list");

    let items = ItemAccessService::new(&store);
    for (name, description, status) in DEMO_ITEMS {
        let status = ItemStatus::parse(status)
            .map_err(|e| CommandError::InvalidArgument(e.to_string()))?;
        let item = items
            .create_item(
                &user.id,
                ItemFields {
                    todo_list_id: list.id,
                    name: (*name).to_string(),
                    description: (*description).to_string(),
                    status,
                },
            )
            .await?;
        tracing::info!(item_id = %item.id, "Created item {}", item.name);
    }

    tracing::info!("Seeded {} items for {}", DEMO_ITEMS.len(), user_name);
    Ok(())
}
