//! Message templates and keyboards.
//!
//! Pure functions from core data to outbound text/keyboards; the dispatcher
//! calls these and hands the result to the transport. Texts use the chat
//! platform's Markdown conventions (`*bold*`, `_italic_`), which the
//! adapter enables when sending.

use crate::{
    core::{
        ledger::{RetractOutcome, SaleOutcome},
        report::{DayReport, ProductTotal, summary_total},
    },
    entities::product,
};

use super::{Button, Keyboard};
use super::event::CallbackAction;
use chrono::NaiveDate;

/// Welcome message for `/start`.
pub const WELCOME_TEXT: &str = "🛍️ *Welcome to the sales tally bot!*\n\n\
    Available commands:\n\n\
    📦 /add - Register a new product\n\
    🛒 /sell - Record a sale or correct one (+1/-1)\n\
    📊 /summary - Today's totals\n\
    📋 /products - List all products\n\
    🗑️ /delete - Remove a product\n\
    📈 /history - Sales for the last 7 days\n\
    ❓ /help - Show this message\n\n\
    *Note:* /sell lets you both add (+1) and remove (-1) sales, so \
    mistakes are easy to correct!";

/// Command guide for `/help`.
pub const HELP_TEXT: &str = "📚 *Command guide*\n\n\
    /add - Register a new product\n\
    /sell - Record or correct sales (+1/-1)\n\
    /summary - Daily totals\n\
    /products - Product list\n\
    /delete - Remove a product\n\
    /history - Last 7 days\n\n\
    💡 *Tip:* Use /sell to add (+1) or remove (-1) a sale. Handy for \
    fixing mistakes!";

/// Prompt sent when the add-product flow starts.
pub const ADD_PRODUCT_PROMPT: &str = "📦 *Add a new product*\n\nSend the product name:";

/// Reply when the submitted name already exists (case-insensitively).
pub const PRODUCT_EXISTS_TEXT: &str = "⚠️ That product already exists!\n\n\
    Try another name, or use /products to see the current list.";

/// Reply when the product list is empty.
pub const NO_PRODUCTS_TEXT: &str =
    "📭 No products yet.\n\nUse /add to register your first product!";

/// Reply when `/sell` finds nothing to sell.
pub const NO_PRODUCTS_TO_SELL_TEXT: &str =
    "📭 No products yet.\n\nUse /add to register products before recording sales!";

/// Reply when `/delete` finds nothing to delete.
pub const NO_PRODUCTS_TO_DELETE_TEXT: &str = "📭 No products to delete.";

/// Header + hint above the sell keyboard.
pub const SELL_MENU_TEXT: &str = "🛒 *Record/Correct a sale*\n\n\
    ➕ Add a sale (+1)\n\
    ➖ Remove a sale (-1)\n\n\
    Pick a product:";

/// Header above the delete keyboard.
pub const DELETE_MENU_TEXT: &str = "🗑️ *Delete a product*\n\nPick the product to delete:";

/// Edit-in-place text after a cancelled menu.
pub const CANCELLED_TEXT: &str = "❌ Operation cancelled.";

/// Short ack for the cancel button.
pub const CANCELLED_NOTICE: &str = "Cancelled";

/// Generic failure notice; details go to the log, not the operator.
pub const FAILURE_TEXT: &str = "❌ Something went wrong. Please try again.";

/// Toast for a callback that references a vanished product.
pub const PRODUCT_NOT_FOUND_NOTICE: &str = "❌ Product not found!";

/// Reply when the last 7 days hold no sales at all.
pub const NO_HISTORY_TEXT: &str = "📈 No sales in the last 7 days.";

/// Confirmation sent after a product is created.
#[must_use]
pub fn product_added_text(name: &str) -> String {
    format!("✅ *Product added!*\n\n📦 {name}\n\nYou can now record sales with /sell")
}

/// Numbered product list with optional price and description lines.
#[must_use]
pub fn product_list_text(products: &[product::Model]) -> String {
    let mut text = String::from("📋 *Product list*\n\n");
    for (index, product) in products.iter().enumerate() {
        text.push_str(&format!("{}. {}", index + 1, product.name));
        if product.price > 0.0 {
            text.push_str(&format!(" - €{:.2}", product.price));
        }
        if let Some(description) = &product.description {
            text.push_str(&format!("\n   _{description}_"));
        }
        text.push_str("\n\n");
    }
    text
}

/// One [+1 name | -1] row per product.
#[must_use]
pub fn sell_menu_keyboard(products: &[product::Model]) -> Keyboard {
    Keyboard::new(
        products
            .iter()
            .map(|product| {
                vec![
                    Button::new(format!("➕ {}", product.name), CallbackAction::Sell(product.id)),
                    Button::new("➖", CallbackAction::Remove(product.id)),
                ]
            })
            .collect(),
    )
}

/// Toast shown right after a +1 tap.
#[must_use]
pub fn sale_recorded_notice(outcome: &SaleOutcome) -> String {
    format!("✅ +1 {}", outcome.product_name)
}

/// Edit-in-place confirmation after a +1 tap.
#[must_use]
pub fn sale_recorded_text(outcome: &SaleOutcome) -> String {
    format!(
        "✅ *Sale recorded!*\n\n\
         📦 Product: {}\n\
         🔢 Quantity: +1\n\n\
         Use /sell for more, or /summary for today's totals.",
        outcome.product_name
    )
}

/// Toast shown right after a -1 tap.
#[must_use]
pub fn sale_retracted_notice(outcome: &RetractOutcome) -> String {
    if outcome.deleted {
        format!("✅ -1 {} (removed entirely)", outcome.product_name)
    } else {
        format!("✅ -1 {} ({} left)", outcome.product_name, outcome.remaining)
    }
}

/// Edit-in-place confirmation after a -1 tap.
#[must_use]
pub fn sale_retracted_text(outcome: &RetractOutcome) -> String {
    if outcome.deleted {
        format!(
            "✅ *Sale removed!*\n\n\
             📦 Product: {}\n\
             🔢 Quantity: -1 (back to zero)\n\n\
             Use /sell for more, or /summary for today's totals.",
            outcome.product_name
        )
    } else {
        format!(
            "✅ *Sale corrected!*\n\n\
             📦 Product: {}\n\
             🔢 Quantity: -1\n\
             📊 Current total: {}\n\n\
             Use /sell for more, or /summary for today's totals.",
            outcome.product_name, outcome.remaining
        )
    }
}

/// Alert shown when there is nothing to retract for the operator today.
#[must_use]
pub fn nothing_to_retract_notice(product_name: &str) -> String {
    format!("⚠️ No sale to remove for {product_name}")
}

/// Daily rollup text; renders a "no sales" body for an empty day.
#[must_use]
pub fn summary_text(day: NaiveDate, lines: &[ProductTotal]) -> String {
    let mut text = format!("📊 *Summary for {}*\n\n", format_day(day));
    if lines.is_empty() {
        text.push_str("📭 No sales recorded today.");
        return text;
    }

    for (index, line) in lines.iter().enumerate() {
        text.push_str(&format!(
            "{}. *{}*: {} pcs\n",
            index + 1,
            line.product_name,
            line.total_quantity
        ));
    }
    text.push_str(&format!(
        "\n📦 *Total items sold: {}*",
        summary_total(lines)
    ));
    text
}

/// The [history] / [refresh] keyboard under the daily summary.
#[must_use]
pub fn summary_keyboard() -> Keyboard {
    Keyboard::new(vec![
        vec![Button::new("📈 Show history", CallbackAction::ShowHistory)],
        vec![Button::new("🔄 Refresh", CallbackAction::RefreshSummary)],
    ])
}

/// Weekly history text, newest day first, one section per non-empty day.
#[must_use]
pub fn history_text(reports: &[DayReport]) -> String {
    let mut text = String::from("📈 *Sales history (last 7 days)*\n\n");
    for report in reports {
        text.push_str(&format!("📅 *{}*\n", format_day(report.day)));
        for line in &report.lines {
            text.push_str(&format!(
                "   • {}: {} pcs\n",
                line.product_name, line.total_quantity
            ));
        }
        text.push_str(&format!("   _Day total: {} pcs_\n\n", report.day_total));
    }
    text
}

/// One row per product plus a cancel row.
#[must_use]
pub fn delete_menu_keyboard(products: &[product::Model]) -> Keyboard {
    let mut rows: Vec<Vec<Button>> = products
        .iter()
        .map(|product| {
            vec![Button::new(
                format!("🗑️ {}", product.name),
                CallbackAction::Delete(product.id),
            )]
        })
        .collect();
    rows.push(vec![Button::new("❌ Cancel", CallbackAction::Cancel)]);
    Keyboard::new(rows)
}

/// Edit-in-place text asking for delete confirmation.
#[must_use]
pub fn confirm_delete_text(product_name: &str) -> String {
    format!(
        "⚠️ *Confirm deletion*\n\n\
         Are you sure you want to delete \"{product_name}\"?\n\n\
         _This cannot be undone._"
    )
}

/// The yes/no row for the delete confirmation.
#[must_use]
pub fn confirm_delete_keyboard(product_id: i64) -> Keyboard {
    Keyboard::new(vec![vec![
        Button::new("✅ Yes, delete", CallbackAction::ConfirmDelete(product_id)),
        Button::new("❌ Cancel", CallbackAction::Cancel),
    ]])
}

/// Edit-in-place confirmation after a soft delete.
#[must_use]
pub fn product_deleted_text(product_name: &str) -> String {
    format!("✅ *Product deleted*\n\n\"{product_name}\" has been removed from the list.")
}

/// Long-format day header, e.g. "Monday,  1 January 2024".
#[must_use]
pub fn format_day(day: NaiveDate) -> String {
    day.format("%A, %e %B %Y").to_string()
}
