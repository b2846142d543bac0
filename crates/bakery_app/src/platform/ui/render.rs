use std::fmt::Write;

use bakery_core::{
    Alert, AppViewModel, CustomerFormView, CustomerRowView, ListView, OrderFormView,
    OrderRowView, Screen,
};
use chrono::{DateTime, Local};

const RULE: &str = "----------------------------------------";

pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();
    match view.screen {
        Screen::Login => render_login(&mut out, view),
        Screen::Customers => {
            heading(&mut out, "Customers");
            render_list(&mut out, &view.customers, "customers", customer_line);
        }
        Screen::Orders => {
            heading(&mut out, "Orders");
            render_list(&mut out, &view.orders, "orders", order_line);
        }
        Screen::CustomerForm => {
            if let Some(form) = &view.customer_form {
                render_customer_form(&mut out, form);
            }
        }
        Screen::OrderForm => {
            if let Some(form) = &view.order_form {
                render_order_form(&mut out, form);
            }
        }
    }
    if let Some(confirmation) = &view.confirmation {
        let _ = writeln!(
            out,
            "\n{}\n{} [y/n]",
            confirmation.title, confirmation.message
        );
    }
    out
}

pub fn render_alert(alert: &Alert) -> String {
    format!("!! {}\n   {}", alert.title, alert.message.replace('\n', "\n   "))
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{RULE}\n{title}\n{RULE}");
}

fn render_login(out: &mut String, view: &AppViewModel) {
    heading(out, "Bakery login");
    if view.login.pending {
        let _ = writeln!(out, "Signing in as {}...", view.login.email);
    } else {
        out.push_str("Type `login <email> <password>`.\n");
    }
}

fn render_list<V>(out: &mut String, list: &ListView<V>, what: &str, line: fn(&V) -> String) {
    match list {
        ListView::Idle => {}
        ListView::Loading => {
            let _ = writeln!(out, "Loading {what}...");
        }
        ListView::Failed(message) => {
            let _ = writeln!(out, "Could not load the {what}: {message}");
            out.push_str("Type `refresh` to try again.\n");
        }
        ListView::Loaded(rows) if rows.is_empty() => {
            let _ = writeln!(out, "No {what} yet.");
        }
        ListView::Loaded(rows) => {
            for row in rows {
                out.push_str(&line(row));
                out.push('\n');
            }
        }
    }
}

fn customer_line(row: &CustomerRowView) -> String {
    let noun = if row.order_count == 1 { "order" } else { "orders" };
    format!(
        "#{:<5} {} ({} years) - {} {}",
        row.id, row.name, row.age, row.order_count, noun
    )
}

fn order_line(row: &OrderRowView) -> String {
    let mut line = format!(
        "#{:<5} {} | {} x{} {} | {} | {}",
        row.id,
        row.customer_name,
        row.flavor,
        row.quantity,
        row.size.label(),
        format_timestamp(row.timestamp),
        row.status.label()
    );
    if row.can_accept() {
        line.push_str("  (accept)");
    }
    line
}

fn render_customer_form(out: &mut String, form: &CustomerFormView) {
    match form.editing {
        Some(id) => heading(out, &format!("Edit customer #{id}")),
        None => heading(out, "New customer"),
    }
    if form.loading {
        out.push_str("Loading customer...\n");
        return;
    }
    let _ = writeln!(out, "Name: {}\nAge:  {}", form.name, form.age);
}

fn render_order_form(out: &mut String, form: &OrderFormView) {
    heading(out, &format!("New order for {}", form.customer_name));
    let _ = writeln!(
        out,
        "Flavor:   {}\nQuantity: {}\nSize:     {}",
        form.flavor,
        form.quantity,
        form.size.label()
    );
}

fn format_timestamp(seconds: i64) -> String {
    DateTime::from_timestamp(seconds, 0)
        .map(|utc| {
            utc.with_timezone(&Local)
                .format("%d/%m/%Y - %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bakery_core::{ConfirmationView, OrderSize, OrderStatus};

    fn order_row(status: OrderStatus) -> OrderRowView {
        OrderRowView {
            id: 12,
            customer_name: "Ana Souza".to_string(),
            flavor: "Chocolate".to_string(),
            quantity: 2,
            size: OrderSize::Medium,
            timestamp: 1_700_000_000,
            status,
        }
    }

    #[test]
    fn only_pending_orders_offer_accept() {
        let pending = order_line(&order_row(OrderStatus::Pending));
        assert!(pending.contains("Ana Souza | Chocolate x2 MEDIUM"));
        assert!(pending.ends_with("PENDING  (accept)"));
        assert!(order_line(&order_row(OrderStatus::Accepted)).ends_with("ACCEPTED"));
    }

    #[test]
    fn failed_list_shows_the_reason() {
        let view = AppViewModel {
            screen: Screen::Customers,
            customers: ListView::Failed("http status 500".to_string()),
            ..AppViewModel::default()
        };
        assert!(render(&view).contains("Could not load the customers: http status 500"));
    }

    #[test]
    fn confirmation_is_appended() {
        let view = AppViewModel {
            screen: Screen::Orders,
            orders: ListView::Loaded(vec![order_row(OrderStatus::Pending)]),
            confirmation: Some(ConfirmationView {
                title: "Delete order?".to_string(),
                message: "Do you want to delete the order of Ana Souza?".to_string(),
            }),
            ..AppViewModel::default()
        };
        let text = render(&view);
        assert!(text.contains("#12"));
        assert!(text.ends_with("Do you want to delete the order of Ana Souza? [y/n]\n"));
    }

    #[test]
    fn out_of_range_timestamp_is_a_dash() {
        assert_eq!(format_timestamp(i64::MAX), "-");
    }
}
