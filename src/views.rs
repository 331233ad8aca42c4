//! Server-rendered HTML pages
//!
//! Every value that came from the user or the database goes through
//! `escape` before it is written into markup.

use crate::models::{CardForm, DashboardSummary, FieldError, InventoryItem, SearchForm};

const STYLE: &str = "
body { font-family: system-ui, sans-serif; margin: 0; background: #f5f5f5; color: #222; }
nav { background: #1f3a5f; padding: 0.75rem 1.5rem; }
nav a { color: #fff; margin-right: 1.25rem; text-decoration: none; font-weight: 600; }
main { max-width: 1100px; margin: 1.5rem auto; padding: 0 1rem; }
.stats { display: flex; gap: 1rem; }
.stat { background: #fff; border-radius: 6px; padding: 1rem 1.5rem; flex: 1; }
.stat strong { display: block; font-size: 1.6rem; }
table { width: 100%; border-collapse: collapse; background: #fff; }
th, td { padding: 0.4rem 0.6rem; border-bottom: 1px solid #ddd; text-align: left; }
form.card label { display: block; margin-top: 0.6rem; }
.notice { background: #e6f4ea; padding: 0.6rem 1rem; border-radius: 4px; }
.errors { background: #fdecea; padding: 0.6rem 1rem; border-radius: 4px; }
.sold { background: #ffd479; border-radius: 3px; padding: 0 0.3rem; font-size: 0.8rem; }
";

/// Wrap a page body in the common layout
fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>
<html lang=\"en\">
<head>
<meta charset=\"utf-8\">
<title>{title} - Card Inventory</title>
<style>{STYLE}</style>
</head>
<body>
<nav><a href=\"/\">Dashboard</a><a href=\"/add\">Add Card</a><a href=\"/view\">Inventory</a></nav>
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>
",
        title = escape(title),
    )
}

/// GET / - totals over the whole collection
pub fn home_page(summary: &DashboardSummary) -> String {
    let body = format!(
        "<div class=\"stats\">
<div class=\"stat\">Total cards<strong>{}</strong></div>
<div class=\"stat\">Total value<strong>{}</strong></div>
<div class=\"stat\">Total sales<strong>{}</strong></div>
<div class=\"stat\">Net<strong>{}</strong></div>
</div>",
        summary.total_cards,
        money(summary.total_value),
        money(summary.total_sales),
        money(summary.net()),
    );
    layout("Dashboard", &body)
}

/// Add form (blank, or re-rendered with errors)
pub fn add_page(form: &CardForm, errors: &[FieldError]) -> String {
    let body = format!(
        "{}{}",
        error_list(errors),
        card_form("/add", form, "Add Card")
    );
    layout("Add Card", &body)
}

/// Edit form, pre-filled with the current values
pub fn edit_page(id: i64, form: &CardForm, errors: &[FieldError]) -> String {
    let body = format!(
        "{}{}<p><a href=\"/delete/{id}\" onclick=\"return confirm('Delete this card?')\">Delete this card</a></p>",
        error_list(errors),
        card_form(&format!("/edit/{id}"), form, "Save Changes"),
    );
    layout(&format!("Edit Card #{id}"), &body)
}

/// Inventory list with search form and empty-state message
pub fn inventory_page(
    items: &[InventoryItem],
    search: &SearchForm,
    notice: Option<&str>,
    errors: &[FieldError],
) -> String {
    let mut body = String::new();
    if let Some(notice) = notice {
        body.push_str(&format!("<p class=\"notice\">{}</p>", escape(notice)));
    }
    body.push_str(&error_list(errors));
    body.push_str(&format!(
        "<form method=\"post\" action=\"/view\">
<input name=\"search\" placeholder=\"Card name or player\" value=\"{}\">
<input name=\"player\" placeholder=\"Exact player\" value=\"{}\">
<input name=\"year\" placeholder=\"Year\" value=\"{}\">
<button type=\"submit\">Search</button> <a href=\"/view\">Clear</a>
</form>",
        opt(&search.search),
        opt(&search.player),
        opt(&search.year),
    ));

    if items.is_empty() {
        body.push_str("<p>No cards found.</p>");
        return layout("Inventory", &body);
    }

    body.push_str(
        "<table>
<tr><th>ID</th><th>Card</th><th>Player</th><th>Year</th><th>Set</th><th>#</th>\
<th>Condition</th><th>Grading</th><th>Qty</th><th>Bought</th><th>Sold</th>\
<th>Vendor/Buyer</th><th></th></tr>",
    );
    for item in items {
        let sold = if item.is_sold() {
            " <span class=\"sold\">sold</span>"
        } else {
            ""
        };
        body.push_str(&format!(
            "<tr><td>{id}</td><td>{name}{sold}</td><td>{player}</td><td>{year}</td>\
<td>{set}</td><td>{number}</td><td>{condition}</td><td>{grading}</td><td>{qty}</td>\
<td>{bought}</td><td>{sale}</td><td>{party}</td>\
<td><a href=\"/edit/{id}\">Edit</a> <a href=\"/delete/{id}\" \
onclick=\"return confirm('Delete this card?')\">Delete</a></td></tr>",
            id = item.id,
            name = escape(&item.card_name),
            player = opt(&item.player),
            year = item.year.map(|y| y.to_string()).unwrap_or_default(),
            set = opt(&item.set_name),
            number = opt(&item.card_number),
            condition = opt(&item.condition),
            grading = opt(&item.grading),
            qty = item.quantity.map(|q| q.to_string()).unwrap_or_default(),
            bought = dated_price(item.purchase_price, &item.purchase_date),
            sale = dated_price(item.sale_price, &item.sale_date),
            party = opt(&item.vendor_or_buyer),
        ));
    }
    body.push_str("</table>");
    layout("Inventory", &body)
}

pub fn not_found_page(message: &str) -> String {
    layout(
        "Not Found",
        &format!(
            "<p>{}</p><p><a href=\"/view\">Back to inventory</a></p>",
            escape(message)
        ),
    )
}

/// Fallback page for rejected input outside a form
pub fn invalid_page(errors: &[FieldError]) -> String {
    layout("Invalid input", &error_list(errors))
}

/// Request the server could not read (bad body or content type)
pub fn rejected_page(message: &str) -> String {
    layout(
        "Invalid request",
        &format!(
            "<p>{}</p><p><a href=\"/view\">Back to inventory</a></p>",
            escape(message)
        ),
    )
}

/// Generic failure page; details stay in the log
pub fn error_page() -> String {
    layout(
        "Something went wrong",
        "<p>The request could not be completed. Please try again.</p>",
    )
}

fn card_form(action: &str, form: &CardForm, submit: &str) -> String {
    let fields: [(&str, &str, &str, &Option<String>); 13] = [
        ("card_name", "Card name *", "text", &form.card_name),
        ("player", "Player", "text", &form.player),
        ("year", "Year", "number", &form.year),
        ("condition", "Condition", "text", &form.condition),
        ("quantity", "Quantity", "number", &form.quantity),
        ("purchase_price", "Purchase price", "text", &form.purchase_price),
        ("purchase_date", "Purchase date", "date", &form.purchase_date),
        ("set_name", "Set", "text", &form.set_name),
        ("card_number", "Card number", "text", &form.card_number),
        ("grading", "Grading", "text", &form.grading),
        ("sale_price", "Sale price", "text", &form.sale_price),
        ("sale_date", "Sale date", "date", &form.sale_date),
        ("vendor_or_buyer", "Vendor or buyer", "text", &form.vendor_or_buyer),
    ];

    let mut html = format!("<form class=\"card\" method=\"post\" action=\"{}\">", escape(action));
    for (name, label, kind, value) in fields {
        html.push_str(&format!(
            "<label>{label}<br><input type=\"{kind}\" name=\"{name}\" value=\"{}\"></label>",
            opt(value),
        ));
    }
    html.push_str(&format!(
        "<p><button type=\"submit\">{}</button></p></form>",
        escape(submit)
    ));
    html
}

fn error_list(errors: &[FieldError]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let mut html = String::from("<ul class=\"errors\">");
    for error in errors {
        html.push_str(&format!("<li>{}</li>", escape(&error.to_string())));
    }
    html.push_str("</ul>");
    html
}

fn dated_price(price: Option<f64>, date: &Option<String>) -> String {
    match (price, date) {
        (Some(p), Some(d)) => format!("{} ({})", money(p), escape(d)),
        (Some(p), None) => money(p),
        (None, Some(d)) => escape(d),
        (None, None) => String::new(),
    }
}

fn money(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.2}", -value)
    } else {
        format!("${:.2}", value)
    }
}

fn opt(value: &Option<String>) -> String {
    value.as_deref().map(escape).unwrap_or_default()
}

/// Escape text for use in HTML content and quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
