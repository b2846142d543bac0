//! Line commands typed at the prompt.

use bakery_core::{Msg, OrderSize, Route, Screen};
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  login <email> <password>   sign in
  logout                     sign out
  customers | orders         open a list
  refresh                    reload the open list
  new-customer               open an empty customer form
  edit <id>                  edit a customer
  order <customer-id>        new order for a listed customer
  name <text> | age <text>   fill the customer form
  flavor <text> | qty <text> fill the order form
  size small|medium|large    pick the cake size
  save                       submit the open form
  delete <id>                delete a row of the open list
  accept <id>                accept a pending order
  y | n                      answer a confirmation
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Vec<Msg>),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command `{0}`; type `help`")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("`{0}` is not a valid id")]
    BadId(String),
    #[error("`delete` needs the customer or order list open")]
    NothingToDelete,
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse(line: &str, screen: Screen) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let msgs = match word.to_ascii_lowercase().as_str() {
        "help" | "?" => return Ok(Some(Command::Help)),
        "quit" | "exit" => return Ok(Some(Command::Quit)),
        "login" => {
            let (email, password) = rest
                .split_once(char::is_whitespace)
                .ok_or(CommandError::Usage("login <email> <password>"))?;
            vec![
                Msg::EmailChanged(email.to_string()),
                Msg::PasswordChanged(password.trim().to_string()),
                Msg::LoginSubmitted,
            ]
        }
        "logout" => vec![Msg::LogoutRequested],
        "customers" => vec![Msg::Navigate(Route::Customers)],
        "orders" => vec![Msg::Navigate(Route::Orders)],
        "refresh" => vec![Msg::RefreshRequested],
        "new-customer" => vec![Msg::Navigate(Route::NewCustomer)],
        "edit" => vec![Msg::Navigate(Route::EditCustomer(parse_id(rest, "edit <id>")?))],
        "order" => vec![Msg::Navigate(Route::NewOrder(parse_id(
            rest,
            "order <customer-id>",
        )?))],
        "name" => vec![Msg::NameChanged(rest.to_string())],
        "age" => vec![Msg::AgeChanged(rest.to_string())],
        "flavor" => vec![Msg::FlavorChanged(rest.to_string())],
        "qty" => vec![Msg::QuantityChanged(rest.to_string())],
        "size" => vec![Msg::SizeSelected(parse_size(rest)?)],
        "save" => vec![Msg::SaveClicked],
        "delete" => {
            let id = parse_id(rest, "delete <id>")?;
            match screen {
                Screen::Customers => vec![Msg::DeleteCustomerClicked(id)],
                Screen::Orders => vec![Msg::DeleteOrderClicked(id)],
                _ => return Err(CommandError::NothingToDelete),
            }
        }
        "accept" => vec![Msg::AcceptOrderClicked(parse_id(rest, "accept <id>")?)],
        "y" | "yes" => vec![Msg::ConfirmationAnswered(true)],
        "n" | "no" => vec![Msg::ConfirmationAnswered(false)],
        _ => return Err(CommandError::Unknown(word.to_string())),
    };
    Ok(Some(Command::Dispatch(msgs)))
}

fn parse_id(text: &str, usage: &'static str) -> Result<u64, CommandError> {
    if text.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    text.trim_start_matches('#')
        .parse()
        .map_err(|_| CommandError::BadId(text.to_string()))
}

fn parse_size(text: &str) -> Result<OrderSize, CommandError> {
    OrderSize::ALL
        .into_iter()
        .find(|size| size.label().eq_ignore_ascii_case(text))
        .ok_or(CommandError::Usage("size small|medium|large"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dispatch(line: &str, screen: Screen) -> Vec<Msg> {
        match parse(line, screen) {
            Ok(Some(Command::Dispatch(msgs))) => msgs,
            other => panic!("`{line}` did not dispatch: {other:?}"),
        }
    }

    #[test]
    fn login_fills_the_form_then_submits() {
        assert_eq!(
            dispatch("login ana@bolos.com  s3 cr3t", Screen::Login),
            vec![
                Msg::EmailChanged("ana@bolos.com".to_string()),
                Msg::PasswordChanged("s3 cr3t".to_string()),
                Msg::LoginSubmitted,
            ]
        );
        assert_eq!(
            parse("login ana@bolos.com", Screen::Login),
            Err(CommandError::Usage("login <email> <password>"))
        );
    }

    #[test]
    fn delete_targets_the_open_list() {
        assert_eq!(
            dispatch("delete 4", Screen::Customers),
            vec![Msg::DeleteCustomerClicked(4)]
        );
        assert_eq!(
            dispatch("delete #9", Screen::Orders),
            vec![Msg::DeleteOrderClicked(9)]
        );
        assert_eq!(
            parse("delete 4", Screen::OrderForm),
            Err(CommandError::NothingToDelete)
        );
    }

    #[test]
    fn form_fields_keep_the_rest_of_the_line() {
        assert_eq!(
            dispatch("name  Ana Maria Souza ", Screen::CustomerForm),
            vec![Msg::NameChanged("Ana Maria Souza".to_string())]
        );
        assert_eq!(
            dispatch("qty", Screen::OrderForm),
            vec![Msg::QuantityChanged(String::new())]
        );
    }

    #[test]
    fn sizes_are_case_insensitive() {
        assert_eq!(
            dispatch("size Large", Screen::OrderForm),
            vec![Msg::SizeSelected(OrderSize::Large)]
        );
        assert_eq!(
            parse("size huge", Screen::OrderForm),
            Err(CommandError::Usage("size small|medium|large"))
        );
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(parse("   ", Screen::Login), Ok(None));
        assert_eq!(parse("QUIT", Screen::Login), Ok(Some(Command::Quit)));
        assert_eq!(
            parse("bake", Screen::Login),
            Err(CommandError::Unknown("bake".to_string()))
        );
        assert_eq!(
            parse("edit abc", Screen::Customers),
            Err(CommandError::BadId("abc".to_string()))
        );
    }
}
