//! Bakery core: pure state machines for the order client.
//!
//! Nothing in this crate performs IO. The shell feeds [`Msg`]s into
//! [`update`], executes the returned [`Effect`]s and renders
//! [`AppState::view`].
mod confirm;
mod effect;
mod list;
mod model;
mod msg;
mod session;
mod state;
mod update;
pub mod validation;
mod view_model;

pub use confirm::PendingAction;
pub use effect::Effect;
pub use list::{
    Enrichment, FetchTicket, ListAction, ListController, ListEvent, ListPhase, ListRow, ScopeId,
    ROOT_SCOPE,
};
pub use model::{Customer, CustomerId, Order, OrderId, OrderSize, OrderStatus, RequestFailure};
pub use msg::{Msg, Route};
pub use session::{AuthError, LoginRejection, Session};
pub use state::{Alert, AppState, CustomerRow, OrderRow, Screen};
pub use update::update;
pub use view_model::{
    AppViewModel, ConfirmationView, CustomerFormView, CustomerRowView, ListView, LoginView,
    OrderFormView, OrderRowView,
};
