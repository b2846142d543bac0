use crate::list::{Enrichment, ListController, ListPhase, ListRow, ScopeId, ROOT_SCOPE};
use crate::view_model::{
    AppViewModel, ConfirmationView, CustomerFormView, CustomerRowView, ListView, LoginView,
    OrderFormView, OrderRowView,
};
use crate::{Customer, CustomerId, FetchTicket, Order, OrderId, OrderSize, PendingAction, Session};

/// Screen currently shown. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Login,
    Customers,
    Orders,
    CustomerForm,
    OrderForm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct LoginForm {
    pub(crate) email: String,
    pub(crate) password: String,
    pub(crate) pending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CustomerForm {
    pub(crate) editing: Option<CustomerId>,
    pub(crate) name: String,
    pub(crate) age: String,
    /// Scope of the initial load when editing.
    pub(crate) scope: Option<ScopeId>,
    pub(crate) loading: Option<FetchTicket>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OrderForm {
    pub(crate) customer: Customer,
    pub(crate) flavor: String,
    pub(crate) quantity: String,
    pub(crate) size: OrderSize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRow {
    pub customer: Customer,
    pub order_count: Enrichment<usize>,
}

impl From<Customer> for CustomerRow {
    fn from(customer: Customer) -> Self {
        Self {
            customer,
            order_count: Enrichment::Pending,
        }
    }
}

impl ListRow for CustomerRow {
    type Key = CustomerId;

    fn key(&self) -> CustomerId {
        self.customer.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRow {
    pub order: Order,
    pub customer_name: Enrichment<String>,
}

impl From<Order> for OrderRow {
    fn from(order: Order) -> Self {
        Self {
            order,
            customer_name: Enrichment::Pending,
        }
    }
}

impl ListRow for OrderRow {
    type Key = OrderId;

    fn key(&self) -> OrderId {
        self.order.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub(crate) session: Session,
    pub(crate) screen: Screen,
    pub(crate) login: LoginForm,
    pub(crate) customers: ListController<CustomerRow>,
    pub(crate) orders: ListController<OrderRow>,
    pub(crate) customer_form: Option<CustomerForm>,
    pub(crate) order_form: Option<OrderForm>,
    pub(crate) pending: Option<PendingAction>,
    pub(crate) alerts: Vec<Alert>,
    last_scope: ScopeId,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            session: Session::default(),
            screen: Screen::Login,
            login: LoginForm::default(),
            customers: ListController::default(),
            orders: ListController::default(),
            customer_form: None,
            order_form: None,
            pending: None,
            alerts: Vec::new(),
            last_scope: ROOT_SCOPE,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn customers(&self) -> &ListController<CustomerRow> {
        &self.customers
    }

    pub fn orders(&self) -> &ListController<OrderRow> {
        &self.orders
    }

    pub fn pending_confirmation(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Drains alerts queued by `update`, oldest first.
    pub fn take_alerts(&mut self) -> Vec<Alert> {
        std::mem::take(&mut self.alerts)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn open_scope(&mut self) -> ScopeId {
        self.last_scope += 1;
        self.last_scope
    }

    pub(crate) fn alert(&mut self, title: &str, message: impl Into<String>) {
        self.alerts.push(Alert {
            title: title.to_string(),
            message: message.into(),
        });
        self.mark_dirty();
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            screen: self.screen,
            login: LoginView {
                email: self.login.email.clone(),
                pending: self.login.pending,
            },
            customers: list_view(self.customers.phase(), |row| CustomerRowView {
                id: row.customer.id,
                name: row.customer.name.clone(),
                age: row.customer.age,
                order_count: row.order_count.value_or(0),
            }),
            orders: list_view(self.orders.phase(), |row| OrderRowView {
                id: row.order.id,
                customer_name: row.customer_name.value_or(String::new()),
                flavor: row.order.flavor.clone(),
                quantity: row.order.quantity,
                size: row.order.size,
                timestamp: row.order.timestamp,
                status: row.order.status,
            }),
            customer_form: self.customer_form.as_ref().map(|form| CustomerFormView {
                editing: form.editing,
                name: form.name.clone(),
                age: form.age.clone(),
                loading: form.loading.is_some(),
            }),
            order_form: self.order_form.as_ref().map(|form| OrderFormView {
                customer_name: form.customer.name.clone(),
                flavor: form.flavor.clone(),
                quantity: form.quantity.clone(),
                size: form.size,
            }),
            confirmation: self.pending.as_ref().map(|action| ConfirmationView {
                title: action.title().to_string(),
                message: action.prompt(),
            }),
        }
    }
}

fn list_view<R, V>(phase: &ListPhase<R>, row_view: impl Fn(&R) -> V) -> ListView<V> {
    match phase {
        ListPhase::Idle => ListView::Idle,
        ListPhase::Loading => ListView::Loading,
        ListPhase::Loaded(rows) => ListView::Loaded(rows.iter().map(row_view).collect()),
        ListPhase::Failed(message) => ListView::Failed(message.clone()),
    }
}
