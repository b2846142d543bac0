use crate::{
    Customer, CustomerId, FetchTicket, LoginRejection, Order, OrderId, OrderSize,
    RequestFailure,
};

/// Screens the user can ask to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Customers,
    Orders,
    NewCustomer,
    EditCustomer(CustomerId),
    /// Order form for a customer of the current customer snapshot.
    NewOrder(CustomerId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the login email field.
    EmailChanged(String),
    /// User edited the login password field.
    PasswordChanged(String),
    /// User pressed the login button.
    LoginSubmitted,
    /// Login call finished. `Ok(None)` is a 2xx answer without a token.
    LoginCompleted(Result<Option<String>, LoginRejection>),
    LogoutRequested,
    Navigate(Route),
    /// User asked the active list screen to reload.
    RefreshRequested,
    CustomersFetched {
        ticket: FetchTicket,
        result: Result<Vec<Customer>, RequestFailure>,
    },
    OrdersFetched {
        ticket: FetchTicket,
        result: Result<Vec<Order>, RequestFailure>,
    },
    /// Enrichment: number of orders of one customer row.
    OrderCountFetched {
        ticket: FetchTicket,
        customer_id: CustomerId,
        result: Result<usize, RequestFailure>,
    },
    /// Enrichment: customer name of one order row.
    CustomerNameFetched {
        ticket: FetchTicket,
        order_id: OrderId,
        result: Result<String, RequestFailure>,
    },
    /// Existing customer loaded into the edit form.
    CustomerLoaded {
        ticket: FetchTicket,
        result: Result<Customer, RequestFailure>,
    },
    NameChanged(String),
    AgeChanged(String),
    FlavorChanged(String),
    QuantityChanged(String),
    SizeSelected(OrderSize),
    /// User pressed save on the active form.
    SaveClicked,
    CustomerSaved {
        name: String,
        result: Result<(), RequestFailure>,
    },
    OrderSaved {
        customer_name: String,
        result: Result<(), RequestFailure>,
    },
    DeleteCustomerClicked(CustomerId),
    DeleteOrderClicked(OrderId),
    /// Answer to the pending yes/no prompt.
    ConfirmationAnswered(bool),
    CustomerDeleted {
        id: CustomerId,
        result: Result<(), RequestFailure>,
    },
    OrderDeleted {
        id: OrderId,
        result: Result<(), RequestFailure>,
    },
    AcceptOrderClicked(OrderId),
    OrderStatusChanged {
        id: OrderId,
        result: Result<(), RequestFailure>,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
