use crate::{CustomerId, FetchTicket, OrderId, OrderSize, OrderStatus, ScopeId};

/// Work the shell must perform on behalf of `update`.
///
/// Every authenticated variant carries the session token it must be sent with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Login {
        email: String,
        password: String,
    },
    FetchCustomers {
        ticket: FetchTicket,
        token: String,
    },
    FetchOrders {
        ticket: FetchTicket,
        token: String,
    },
    CountCustomerOrders {
        ticket: FetchTicket,
        customer_id: CustomerId,
        token: String,
    },
    FetchCustomerName {
        ticket: FetchTicket,
        order_id: OrderId,
        customer_id: CustomerId,
        token: String,
    },
    LoadCustomer {
        ticket: FetchTicket,
        customer_id: CustomerId,
        token: String,
    },
    CreateCustomer {
        name: String,
        age: u32,
        token: String,
    },
    UpdateCustomer {
        id: CustomerId,
        name: String,
        age: u32,
        token: String,
    },
    DeleteCustomer {
        id: CustomerId,
        token: String,
    },
    CreateOrder {
        customer_id: CustomerId,
        customer_name: String,
        flavor: String,
        quantity: u32,
        size: OrderSize,
        token: String,
    },
    SetOrderStatus {
        id: OrderId,
        status: OrderStatus,
        token: String,
    },
    DeleteOrder {
        id: OrderId,
        token: String,
    },
    /// The screen owning `scope` is gone; abort its in-flight calls.
    CancelScope {
        scope: ScopeId,
    },
}
