//! Form checks run before any request leaves the client.
//!
//! Every rule is pure and returns a [`Validation`]; the form-level helpers
//! merge the rules of one form and, when all pass, hand back the parsed values.

use std::sync::LazyLock;

use regex::Regex;

use crate::OrderSize;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9.]+@[a-z0-9]+\.[a-z]+(\.[a-z]+)?$").expect("email pattern compiles")
});

const MIN_NAME_CHARS: usize = 4;
const MAX_AGE_DIGITS: usize = 2;

/// Outcome of one or more rules: valid when no message was collected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Validation {
    pub errors: Vec<String>,
}

impl Validation {
    pub fn ok() -> Self {
        Self::default()
    }

    fn fail(message: &str) -> Self {
        Self {
            errors: vec![message.to_string()],
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Appends the messages of `other`, keeping rule order.
    pub fn merge(mut self, other: Validation) -> Self {
        self.errors.extend(other.errors);
        self
    }

    /// All messages as one alert body.
    pub fn summary(&self) -> String {
        self.errors.join("\n")
    }
}

pub fn check_email(email: &str) -> Validation {
    let email = email.trim();
    if email.is_empty() {
        Validation::fail("Email is empty")
    } else if !EMAIL_PATTERN.is_match(email) {
        Validation::fail("Email is invalid")
    } else {
        Validation::ok()
    }
}

pub fn check_password(password: &str) -> Validation {
    if password.trim().is_empty() {
        Validation::fail("Password is empty")
    } else {
        Validation::ok()
    }
}

pub fn check_customer_name(name: &str) -> Validation {
    let name = name.trim();
    let mut validation = Validation::ok();
    if name.chars().count() < MIN_NAME_CHARS {
        validation = validation.merge(Validation::fail("Name is invalid"));
    }
    if name.split_whitespace().count() < 2 {
        validation = validation.merge(Validation::fail("You must enter first and last name"));
    }
    validation
}

pub fn check_customer_age(age: &str) -> Validation {
    let age = age.trim();
    if age.is_empty() || age.len() > MAX_AGE_DIGITS || !age.bytes().all(|b| b.is_ascii_digit()) {
        Validation::fail("Age is invalid")
    } else {
        Validation::ok()
    }
}

pub fn check_flavor(flavor: &str) -> Validation {
    if flavor.trim().is_empty() {
        Validation::fail("Flavor is invalid")
    } else {
        Validation::ok()
    }
}

pub fn check_quantity(quantity: &str) -> Validation {
    match quantity.trim().parse::<u32>() {
        Ok(n) if n > 0 => Validation::ok(),
        _ => Validation::fail("Quantity is invalid"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDraft {
    pub name: String,
    pub age: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub flavor: String,
    pub quantity: u32,
    pub size: OrderSize,
}

pub fn validate_login(email: &str, password: &str) -> Validation {
    check_email(email).merge(check_password(password))
}

pub fn validate_customer(name: &str, age: &str) -> Result<CustomerDraft, Validation> {
    let validation = check_customer_name(name).merge(check_customer_age(age));
    match age.trim().parse::<u32>() {
        Ok(age) if validation.is_valid() => Ok(CustomerDraft {
            name: name.trim().to_string(),
            age,
        }),
        _ => Err(validation),
    }
}

pub fn validate_order(
    flavor: &str,
    quantity: &str,
    size: OrderSize,
) -> Result<OrderDraft, Validation> {
    let validation = check_flavor(flavor).merge(check_quantity(quantity));
    match quantity.trim().parse::<u32>() {
        Ok(quantity) if validation.is_valid() => Ok(OrderDraft {
            flavor: flavor.trim().to_string(),
            quantity,
            size,
        }),
        _ => Err(validation),
    }
}
