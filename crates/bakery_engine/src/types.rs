use std::fmt;

use thiserror::Error;

use crate::wire::{CustomerRecord, NewCustomer, NewOrder, OrderRecord, StatusCode, TokenResponse};

pub type CallId = u64;

/// Cancellation scope of a call; mirrors the screen scopes of the core.
pub type ScopeId = u64;

/// A single remote action with everything needed to issue it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Login { email: String, password: String },
    ListCustomers { token: Option<String> },
    GetCustomer { id: u64, token: Option<String> },
    CreateCustomer { customer: NewCustomer, token: Option<String> },
    UpdateCustomer { id: u64, customer: NewCustomer, token: Option<String> },
    DeleteCustomer { id: u64, token: Option<String> },
    CountCustomerOrders { id: u64, token: Option<String> },
    ListOrders { token: Option<String> },
    CreateOrder { order: NewOrder, token: Option<String> },
    UpdateOrderStatus { id: u64, status: StatusCode, token: Option<String> },
    DeleteOrder { id: u64, token: Option<String> },
}

impl ApiCall {
    /// Short name for log lines. Never includes credentials.
    pub fn name(&self) -> &'static str {
        match self {
            ApiCall::Login { .. } => "login",
            ApiCall::ListCustomers { .. } => "list_customers",
            ApiCall::GetCustomer { .. } => "get_customer",
            ApiCall::CreateCustomer { .. } => "create_customer",
            ApiCall::UpdateCustomer { .. } => "update_customer",
            ApiCall::DeleteCustomer { .. } => "delete_customer",
            ApiCall::CountCustomerOrders { .. } => "count_customer_orders",
            ApiCall::ListOrders { .. } => "list_orders",
            ApiCall::CreateOrder { .. } => "create_order",
            ApiCall::UpdateOrderStatus { .. } => "update_order_status",
            ApiCall::DeleteOrder { .. } => "delete_order",
        }
    }
}

/// Parsed body of a successful call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiReply {
    Token(TokenResponse),
    Customers(Vec<CustomerRecord>),
    Customer(CustomerRecord),
    Orders(Vec<OrderRecord>),
    Count(usize),
    /// Mutation accepted; its body is not used.
    Done,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Completed {
        call_id: CallId,
        scope: ScopeId,
        result: Result<ApiReply, RequestError>,
    },
    /// The call's scope was closed before it finished; no result follows.
    Cancelled { call_id: CallId, scope: ScopeId },
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {message}")]
pub struct RequestError {
    pub kind: FailureKind,
    pub message: String,
    /// Error payload sent by the server, when it was JSON.
    pub body: Option<serde_json::Value>,
}

impl RequestError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            body: None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self.kind {
            FailureKind::HttpStatus(code) => Some(code),
            _ => None,
        }
    }

    /// Truthiness of `key` in the error payload, `None` when absent.
    pub fn body_flag(&self, key: &str) -> Option<bool> {
        let value = self.body.as_ref()?.get(key)?;
        Some(is_truthy(value))
    }
}

fn is_truthy(value: &serde_json::Value) -> bool {
    use serde_json::Value;
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Network,
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "unexpected response body"),
        }
    }
}
