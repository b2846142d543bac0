use crate::{CustomerId, OrderId, OrderSize, OrderStatus, Screen};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub screen: Screen,
    pub login: LoginView,
    pub customers: ListView<CustomerRowView>,
    pub orders: ListView<OrderRowView>,
    pub customer_form: Option<CustomerFormView>,
    pub order_form: Option<OrderFormView>,
    pub confirmation: Option<ConfirmationView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginView {
    pub email: String,
    pub pending: bool,
}

/// Render-ready list state. `Loading` and `Failed` never carry rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView<V> {
    Idle,
    Loading,
    Loaded(Vec<V>),
    Failed(String),
}

impl<V> Default for ListView<V> {
    fn default() -> Self {
        ListView::Idle
    }
}

impl<V> ListView<V> {
    pub fn rows(&self) -> &[V] {
        match self {
            ListView::Loaded(rows) => rows,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRowView {
    pub id: CustomerId,
    pub name: String,
    pub age: u32,
    pub order_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRowView {
    pub id: OrderId,
    pub customer_name: String,
    pub flavor: String,
    pub quantity: u32,
    pub size: OrderSize,
    pub timestamp: i64,
    pub status: OrderStatus,
}

impl OrderRowView {
    pub fn can_accept(&self) -> bool {
        self.status == OrderStatus::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerFormView {
    pub editing: Option<CustomerId>,
    pub name: String,
    pub age: String,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderFormView {
    pub customer_name: String,
    pub flavor: String,
    pub quantity: String,
    pub size: OrderSize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationView {
    pub title: String,
    pub message: String,
}
