//! Catalog CLI commands
//!
//! Budgets, bills and accounts that rule actions link journals to.

use clap::Subcommand;

use crate::error::{RulesError, RulesResult};
use crate::models::AccountType;
use crate::services::CatalogService;
use crate::storage::Storage;

/// Catalog subcommands
#[derive(Subcommand, Debug)]
pub enum CatalogCommands {
    /// List accounts, categories, budgets and bills
    List,
    /// Add a budget that set_budget actions can link
    AddBudget {
        name: String,
    },
    /// Add a bill that link_to_bill actions can link
    AddBill {
        name: String,
    },
    /// Register an account
    AddAccount {
        name: String,
        /// Account type (asset, expense, revenue, liability)
        #[arg(short = 't', long, default_value = "asset")]
        account_type: String,
    },
}

/// Handle `rulebook catalog`
pub fn handle_catalog_command(storage: &Storage, cmd: CatalogCommands) -> RulesResult<()> {
    let service = CatalogService::new(storage);

    match cmd {
        CatalogCommands::List => {
            let catalog = service.list()?;

            println!("Accounts:");
            if catalog.accounts.is_empty() {
                println!("  (none)");
            }
            for account in &catalog.accounts {
                println!("  {} {}", account.id, account);
            }
            print_names("Categories", &catalog.categories);
            print_names("Budgets", &catalog.budgets);
            print_names("Bills", &catalog.bills);
        }
        CatalogCommands::AddBudget { name } => {
            service.add_budget(&name)?;
            println!("Added budget: {}", name.trim());
        }
        CatalogCommands::AddBill { name } => {
            service.add_bill(&name)?;
            println!("Added bill: {}", name.trim());
        }
        CatalogCommands::AddAccount { name, account_type } => {
            let account_type = AccountType::parse(&account_type).ok_or_else(|| {
                RulesError::Validation(format!(
                    "Invalid account type: '{}'. Valid types: asset, expense, revenue, liability",
                    account_type
                ))
            })?;
            let account = service.add_account(&name, account_type)?;
            println!("Account: {}", account);
            println!("  ID: {}", account.id);
        }
    }

    Ok(())
}

fn print_names(title: &str, names: &[String]) {
    println!("{}:", title);
    if names.is_empty() {
        println!("  (none)");
    }
    for name in names {
        println!("  {}", name);
    }
}
