//! Journal display formatting
//!
//! Register rows and detail views for transaction journals.

use crate::models::{TransactionJournal, TransactionType};

/// Format a single journal for display (register row)
pub fn format_journal_row(journal: &TransactionJournal) -> String {
    let type_icon = match journal.transaction_type {
        TransactionType::Withdrawal => "-",
        TransactionType::Deposit => "+",
        TransactionType::Transfer => "⇄",
        TransactionType::OpeningBalance | TransactionType::Reconciliation => "=",
    };

    let description = if journal.description.is_empty() {
        "(no description)".to_string()
    } else {
        journal.description.clone()
    };

    format!(
        "{} {} {} {:28} {:>12} {:16}",
        journal.id,
        type_icon,
        journal.date.format("%Y-%m-%d"),
        truncate(&description, 28),
        journal.amount,
        truncate(journal.category.as_deref().unwrap_or(""), 16)
    )
}

/// Format a list of journals as a register
pub fn format_journal_register(journals: &[TransactionJournal]) -> String {
    if journals.is_empty() {
        return "No journals found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:12} {:1} {:10} {:28} {:>12} {:16}\n",
        "ID", "", "Date", "Description", "Amount", "Category"
    ));
    output.push_str(&"-".repeat(84));
    output.push('\n');

    for journal in journals {
        output.push_str(&format_journal_row(journal));
        output.push('\n');
    }

    output
}

/// Format journal details for display
pub fn format_journal_details(journal: &TransactionJournal) -> String {
    let mut output = String::new();

    output.push_str(&format!("Journal:     {}\n", journal.id));
    output.push_str(&format!("Type:        {}\n", journal.transaction_type));
    output.push_str(&format!("Date:        {}\n", journal.date.format("%Y-%m-%d")));
    output.push_str(&format!("Description: {}\n", journal.description));
    output.push_str(&format!(
        "Amount:      {} {}\n",
        journal.amount, journal.currency_code
    ));
    output.push_str(&format!("From:        {}\n", journal.source));
    output.push_str(&format!("To:          {}\n", journal.destination));

    output.push_str(&format!(
        "Category:    {}\n",
        journal.category.as_deref().unwrap_or("(uncategorized)")
    ));
    if let Some(budget) = &journal.budget {
        output.push_str(&format!("Budget:      {}\n", budget));
    }
    if let Some(bill) = &journal.bill {
        output.push_str(&format!("Bill:        {}\n", bill));
    }
    if !journal.tags.is_empty() {
        output.push_str(&format!("Tags:        {}\n", journal.tags.join(", ")));
    }
    if let Some(notes) = &journal.notes {
        output.push_str(&format!("Notes:       {}\n", notes));
    }
    if journal.attachment_count > 0 {
        output.push_str(&format!("Attachments: {}\n", journal.attachment_count));
    }

    output
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        format!("{}...", s.chars().take(max_len - 3).collect::<String>())
    }
}
