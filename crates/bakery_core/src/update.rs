use bakery_logging::{bakery_debug, bakery_info, bakery_warn};

use crate::list::{Enrichment, ListAction, ListEvent};
use crate::state::{CustomerForm, CustomerRow, LoginForm, OrderForm, OrderRow};
use crate::validation::{validate_customer, validate_login, validate_order};
use crate::{
    AppState, AuthError, Customer, CustomerId, Effect, FetchTicket, LoginRejection, Msg,
    OrderSize, OrderStatus, PendingAction, RequestFailure, Route, Screen,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::EmailChanged(email) => {
            state.login.email = email;
            state.mark_dirty();
            Vec::new()
        }
        Msg::PasswordChanged(password) => {
            state.login.password = password;
            state.mark_dirty();
            Vec::new()
        }
        Msg::LoginSubmitted => submit_login(&mut state),
        Msg::LoginCompleted(result) => complete_login(&mut state, result),
        Msg::LogoutRequested => logout(&mut state),
        Msg::Navigate(route) => navigate(&mut state, route),
        Msg::RefreshRequested => match state.screen {
            Screen::Customers => refresh_customers(&mut state),
            Screen::Orders => refresh_orders(&mut state),
            _ => Vec::new(),
        },
        Msg::CustomersFetched { ticket, result } => {
            let result = result
                .map(|customers| customers.into_iter().map(CustomerRow::from).collect())
                .map_err(|failure| load_error("customers", &failure));
            let action = state
                .customers
                .transition(ListEvent::Fetched { ticket, result });
            customer_list_effects(&mut state, action)
        }
        Msg::OrdersFetched { ticket, result } => {
            let result = result
                .map(|orders| orders.into_iter().map(OrderRow::from).collect())
                .map_err(|failure| load_error("orders", &failure));
            let action = state.orders.transition(ListEvent::Fetched { ticket, result });
            order_list_effects(&mut state, action)
        }
        Msg::OrderCountFetched {
            ticket,
            customer_id,
            result,
        } => {
            let count = match result {
                Ok(count) => Enrichment::Ready(count),
                Err(failure) => {
                    bakery_warn!(
                        "Order count for customer {} unavailable: {}",
                        customer_id,
                        failure.message
                    );
                    Enrichment::Unavailable
                }
            };
            if state
                .customers
                .update_row(ticket, customer_id, |row| row.order_count = count)
            {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::CustomerNameFetched {
            ticket,
            order_id,
            result,
        } => {
            let name = match result {
                Ok(name) => Enrichment::Ready(name),
                Err(failure) => {
                    bakery_warn!(
                        "Customer name for order {} unavailable: {}",
                        order_id,
                        failure.message
                    );
                    Enrichment::Unavailable
                }
            };
            if state
                .orders
                .update_row(ticket, order_id, |row| row.customer_name = name)
            {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::CustomerLoaded { ticket, result } => {
            customer_loaded(&mut state, ticket, result);
            Vec::new()
        }
        Msg::NameChanged(name) => {
            if let Some(form) = state.customer_form.as_mut() {
                form.name = name;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::AgeChanged(age) => {
            if let Some(form) = state.customer_form.as_mut() {
                form.age = age;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::FlavorChanged(flavor) => {
            if let Some(form) = state.order_form.as_mut() {
                form.flavor = flavor;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::QuantityChanged(quantity) => {
            if let Some(form) = state.order_form.as_mut() {
                form.quantity = quantity;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SizeSelected(size) => {
            if let Some(form) = state.order_form.as_mut() {
                form.size = size;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SaveClicked => match state.screen {
            Screen::CustomerForm => save_customer(&mut state),
            Screen::OrderForm => save_order(&mut state),
            _ => Vec::new(),
        },
        Msg::CustomerSaved { name, result } => {
            match result {
                Ok(()) => state.alert("Customer saved", format!("The customer {name} was saved!")),
                Err(failure) => {
                    bakery_warn!("Saving customer failed: {}", failure.message);
                    state.alert(
                        "Could not save the customer",
                        "The customer could not be saved to the database",
                    );
                }
            }
            Vec::new()
        }
        Msg::OrderSaved {
            customer_name,
            result,
        } => {
            match result {
                Ok(()) => state.alert(
                    "Order saved",
                    format!("The cake for {customer_name} was registered!"),
                ),
                Err(failure) => {
                    bakery_warn!("Saving order failed: {}", failure.message);
                    state.alert(
                        "Could not save the order",
                        "The order could not be saved to the database",
                    );
                }
            }
            Vec::new()
        }
        Msg::DeleteCustomerClicked(id) => {
            if state.screen == Screen::Customers {
                if let Some(row) = state.customers.find(id) {
                    state.pending = Some(PendingAction::DeleteCustomer {
                        id,
                        name: row.customer.name.clone(),
                    });
                    state.mark_dirty();
                }
            }
            Vec::new()
        }
        Msg::DeleteOrderClicked(id) => {
            if state.screen == Screen::Orders {
                if let Some(row) = state.orders.find(id) {
                    let customer_name = match &row.customer_name {
                        Enrichment::Ready(name) => Some(name.clone()),
                        Enrichment::Pending | Enrichment::Unavailable => None,
                    };
                    state.pending = Some(PendingAction::DeleteOrder { id, customer_name });
                    state.mark_dirty();
                }
            }
            Vec::new()
        }
        Msg::ConfirmationAnswered(confirmed) => answer_confirmation(&mut state, confirmed),
        Msg::CustomerDeleted { id, result } => match result {
            Ok(()) => {
                bakery_info!("Customer {} deleted", id);
                refresh_customers(&mut state)
            }
            Err(failure) => {
                // Not shown to the user.
                bakery_warn!("Deleting customer {} failed: {}", id, failure.message);
                Vec::new()
            }
        },
        Msg::OrderDeleted { id, result } => match result {
            Ok(()) => {
                bakery_info!("Order {} deleted", id);
                refresh_orders(&mut state)
            }
            Err(failure) => {
                bakery_warn!("Deleting order {} failed: {}", id, failure.message);
                Vec::new()
            }
        },
        Msg::AcceptOrderClicked(id) => match state.session.token() {
            Some(token) => vec![Effect::SetOrderStatus {
                id,
                status: OrderStatus::Accepted,
                token: token.to_string(),
            }],
            None => Vec::new(),
        },
        Msg::OrderStatusChanged { id, result } => {
            if let Err(failure) = result {
                bakery_warn!("Accepting order {} failed: {}", id, failure.message);
            }
            refresh_orders(&mut state)
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn load_error(what: &str, failure: &RequestFailure) -> String {
    bakery_warn!("Loading {} failed: {}", what, failure.message);
    format!("Could not load the {what}: {}", failure.message)
}

fn submit_login(state: &mut AppState) -> Vec<Effect> {
    if state.session.is_authenticated() || state.login.pending {
        return Vec::new();
    }
    let validation = validate_login(&state.login.email, &state.login.password);
    if !validation.is_valid() {
        state.alert("Invalid login", validation.summary());
        return Vec::new();
    }
    let email = state.login.email.trim().to_string();
    bakery_info!("Login submitted for {}", email);
    state.login.pending = true;
    state.mark_dirty();
    vec![Effect::Login {
        email,
        password: state.login.password.clone(),
    }]
}

fn complete_login(
    state: &mut AppState,
    result: Result<Option<String>, LoginRejection>,
) -> Vec<Effect> {
    if !state.login.pending {
        bakery_debug!("Ignoring login result with no login in flight");
        return Vec::new();
    }
    state.login.pending = false;
    state.mark_dirty();
    let email = state.login.email.trim().to_string();
    match result {
        Ok(Some(token)) if !token.is_empty() => {
            bakery_info!("Login succeeded for {}", email);
            state.session.establish(token);
            state.login.password.clear();
            open(state, Mount::Customers)
        }
        Ok(_) => {
            bakery_warn!("Login answer for {} carried no token", email);
            state.alert(
                "Invalid login",
                AuthError::InvalidCredentials { email }.to_string(),
            );
            Vec::new()
        }
        Err(rejection) => {
            bakery_warn!("Login rejected for {}: {}", email, rejection.failure.message);
            let error = AuthError::classify(&email, &rejection);
            state.alert("Invalid login", error.to_string());
            Vec::new()
        }
    }
}

fn logout(state: &mut AppState) -> Vec<Effect> {
    if !state.session.is_authenticated() {
        return Vec::new();
    }
    let effects = close_active_screen(state);
    state.session.clear();
    state.screen = Screen::Login;
    state.login = LoginForm {
        email: std::mem::take(&mut state.login.email),
        ..LoginForm::default()
    };
    state.mark_dirty();
    bakery_info!("Logged out");
    effects
}

fn navigate(state: &mut AppState, route: Route) -> Vec<Effect> {
    if !state.session.is_authenticated() {
        return Vec::new();
    }
    let target = match route {
        Route::Customers if state.screen == Screen::Customers => return Vec::new(),
        Route::Orders if state.screen == Screen::Orders => return Vec::new(),
        Route::Customers => Mount::Customers,
        Route::Orders => Mount::Orders,
        Route::NewCustomer => Mount::NewCustomer,
        Route::EditCustomer(id) => Mount::EditCustomer(id),
        // The customer must be resolved before the list that holds it is closed.
        Route::NewOrder(id) => match state.customers.find(id) {
            Some(row) => Mount::NewOrder(row.customer.clone()),
            None => {
                bakery_warn!("Customer {} is not in the current list", id);
                return Vec::new();
            }
        },
    };
    let mut effects = close_active_screen(state);
    effects.extend(open(state, target));
    effects
}

/// A screen about to become active, with everything needed to mount it.
enum Mount {
    Customers,
    Orders,
    NewCustomer,
    EditCustomer(CustomerId),
    NewOrder(Customer),
}

/// Unmounts whatever screen is active. Its snapshot or form is discarded.
fn close_active_screen(state: &mut AppState) -> Vec<Effect> {
    state.pending = None;
    let effects = match state.screen {
        Screen::Customers => {
            let action = state.customers.transition(ListEvent::Unmount);
            customer_list_effects(state, action)
        }
        Screen::Orders => {
            let action = state.orders.transition(ListEvent::Unmount);
            order_list_effects(state, action)
        }
        Screen::CustomerForm => state
            .customer_form
            .take()
            .and_then(|form| form.scope)
            .map(|scope| vec![Effect::CancelScope { scope }])
            .unwrap_or_default(),
        Screen::OrderForm => {
            state.order_form = None;
            Vec::new()
        }
        Screen::Login => Vec::new(),
    };
    state.mark_dirty();
    effects
}

fn open(state: &mut AppState, target: Mount) -> Vec<Effect> {
    let Some(token) = state.session.token().map(str::to_string) else {
        return Vec::new();
    };
    state.mark_dirty();
    match target {
        Mount::Customers => {
            state.screen = Screen::Customers;
            let scope = state.open_scope();
            let action = state.customers.transition(ListEvent::Mount(scope));
            customer_list_effects(state, action)
        }
        Mount::Orders => {
            state.screen = Screen::Orders;
            let scope = state.open_scope();
            let action = state.orders.transition(ListEvent::Mount(scope));
            order_list_effects(state, action)
        }
        Mount::NewCustomer => {
            state.screen = Screen::CustomerForm;
            state.customer_form = Some(CustomerForm {
                editing: None,
                name: String::new(),
                age: String::new(),
                scope: None,
                loading: None,
            });
            Vec::new()
        }
        Mount::EditCustomer(customer_id) => {
            state.screen = Screen::CustomerForm;
            let scope = state.open_scope();
            let ticket = FetchTicket { scope, seq: 1 };
            state.customer_form = Some(CustomerForm {
                editing: Some(customer_id),
                name: String::new(),
                age: String::new(),
                scope: Some(scope),
                loading: Some(ticket),
            });
            vec![Effect::LoadCustomer {
                ticket,
                customer_id,
                token,
            }]
        }
        Mount::NewOrder(customer) => {
            state.screen = Screen::OrderForm;
            state.order_form = Some(OrderForm {
                customer,
                flavor: String::new(),
                quantity: String::new(),
                size: OrderSize::default(),
            });
            Vec::new()
        }
    }
}

fn customer_loaded(
    state: &mut AppState,
    ticket: FetchTicket,
    result: Result<Customer, RequestFailure>,
) {
    let Some(form) = state.customer_form.as_mut() else {
        return;
    };
    if form.loading != Some(ticket) {
        bakery_debug!("Dropping stale customer load scope={}", ticket.scope);
        return;
    }
    form.loading = None;
    match result {
        Ok(customer) => {
            form.name = customer.name;
            form.age = customer.age.to_string();
        }
        Err(failure) => {
            bakery_warn!(
                "Loading customer {:?} for edit failed: {}",
                form.editing,
                failure.message
            );
        }
    }
    state.mark_dirty();
}

fn save_customer(state: &mut AppState) -> Vec<Effect> {
    let (Some(token), Some(form)) = (state.session.token(), state.customer_form.as_ref()) else {
        return Vec::new();
    };
    match validate_customer(&form.name, &form.age) {
        Ok(draft) => {
            let token = token.to_string();
            vec![match form.editing {
                None => Effect::CreateCustomer {
                    name: draft.name,
                    age: draft.age,
                    token,
                },
                Some(id) => Effect::UpdateCustomer {
                    id,
                    name: draft.name,
                    age: draft.age,
                    token,
                },
            }]
        }
        Err(validation) => {
            state.alert("Invalid form", validation.summary());
            Vec::new()
        }
    }
}

fn save_order(state: &mut AppState) -> Vec<Effect> {
    let (Some(token), Some(form)) = (state.session.token(), state.order_form.as_ref()) else {
        return Vec::new();
    };
    match validate_order(&form.flavor, &form.quantity, form.size) {
        Ok(draft) => vec![Effect::CreateOrder {
            customer_id: form.customer.id,
            customer_name: form.customer.name.clone(),
            flavor: draft.flavor,
            quantity: draft.quantity,
            size: draft.size,
            token: token.to_string(),
        }],
        Err(validation) => {
            state.alert("Invalid form", validation.summary());
            Vec::new()
        }
    }
}

fn answer_confirmation(state: &mut AppState, confirmed: bool) -> Vec<Effect> {
    let Some(action) = state.pending.take() else {
        return Vec::new();
    };
    state.mark_dirty();
    if !confirmed {
        bakery_debug!("Declined: {}", action.prompt());
        return Vec::new();
    }
    let Some(token) = state.session.token().map(str::to_string) else {
        return Vec::new();
    };
    match action {
        PendingAction::DeleteCustomer { id, .. } => vec![Effect::DeleteCustomer { id, token }],
        PendingAction::DeleteOrder { id, .. } => vec![Effect::DeleteOrder { id, token }],
    }
}

fn refresh_customers(state: &mut AppState) -> Vec<Effect> {
    let action = state.customers.transition(ListEvent::Refresh);
    customer_list_effects(state, action)
}

fn refresh_orders(state: &mut AppState) -> Vec<Effect> {
    let action = state.orders.transition(ListEvent::Refresh);
    order_list_effects(state, action)
}

fn customer_list_effects(state: &mut AppState, action: Option<ListAction>) -> Vec<Effect> {
    let Some(action) = action else {
        return Vec::new();
    };
    state.mark_dirty();
    let token = state.session.token().unwrap_or_default().to_string();
    match action {
        ListAction::Fetch(ticket) => vec![Effect::FetchCustomers { ticket, token }],
        ListAction::Loaded(ticket) => state
            .customers
            .rows()
            .iter()
            .map(|row| Effect::CountCustomerOrders {
                ticket,
                customer_id: row.customer.id,
                token: token.clone(),
            })
            .collect(),
        ListAction::Failed(message) => {
            state.alert("Error loading", message);
            Vec::new()
        }
        ListAction::CloseScope(scope) => vec![Effect::CancelScope { scope }],
    }
}

fn order_list_effects(state: &mut AppState, action: Option<ListAction>) -> Vec<Effect> {
    let Some(action) = action else {
        return Vec::new();
    };
    state.mark_dirty();
    let token = state.session.token().unwrap_or_default().to_string();
    match action {
        ListAction::Fetch(ticket) => vec![Effect::FetchOrders { ticket, token }],
        ListAction::Loaded(ticket) => state
            .orders
            .rows()
            .iter()
            .map(|row| Effect::FetchCustomerName {
                ticket,
                order_id: row.order.id,
                customer_id: row.order.customer_id,
                token: token.clone(),
            })
            .collect(),
        ListAction::Failed(message) => {
            state.alert("Error loading", message);
            Vec::new()
        }
        ListAction::CloseScope(scope) => vec![Effect::CancelScope { scope }],
    }
}
