//! Category CLI commands
//!
//! Implements CLI commands for category management.

use clap::Subcommand;

use crate::display::category::format_category_list;
use crate::error::{KnotbookError, KnotbookResult};
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Create a new category
    Add {
        /// Category name
        name: String,
    },

    /// List all categories
    List,

    /// Rename a category
    Rename {
        /// Category name or ID
        category: String,
        /// New name
        name: String,
    },

    /// Delete a category (refused while any cost references it)
    Delete {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> KnotbookResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::Add { name } => {
            let category = service.create(&name)?;
            println!("Created category: {}", category.name);
            println!("  ID: {}", category.id.as_uuid());
        }

        CategoryCommands::List => {
            let categories = service.list()?;
            print!("{}", format_category_list(&categories));
        }

        CategoryCommands::Rename { category, name } => {
            let existing = service
                .find(&category)?
                .ok_or_else(|| KnotbookError::category_not_found(&category))?;

            let renamed = service.rename(existing.id, &name)?;
            println!("Renamed category to: {}", renamed.name);
        }

        CategoryCommands::Delete { category } => {
            let existing = service
                .find(&category)?
                .ok_or_else(|| KnotbookError::category_not_found(&category))?;

            service.delete(existing.id)?;
            println!("Deleted category: {}", existing.name);
        }
    }

    Ok(())
}
