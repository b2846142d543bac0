use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use bakery_core::{
    Customer, CustomerId, Effect, FetchTicket, LoginRejection, Msg, Order, OrderId, OrderSize,
    OrderStatus, RequestFailure, ROOT_SCOPE,
};
use bakery_engine::wire::{CakeSize, CustomerRecord, NewCustomer, NewOrder, OrderRecord, StatusCode};
use bakery_engine::{ApiCall, ApiReply, CallId, EngineEvent, EngineHandle, RequestError, ScopeId};
use bakery_logging::{bakery_debug, bakery_info, bakery_warn};

/// What to turn an engine result into once it arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Reply {
    Login,
    Customers(FetchTicket),
    Orders(FetchTicket),
    OrderCount {
        ticket: FetchTicket,
        customer_id: CustomerId,
    },
    CustomerName {
        ticket: FetchTicket,
        order_id: OrderId,
    },
    CustomerForm(FetchTicket),
    CustomerSaved {
        name: String,
    },
    OrderSaved {
        customer_name: String,
    },
    CustomerDeleted(CustomerId),
    OrderDeleted(OrderId),
    StatusChanged(OrderId),
}

type PendingCalls = Arc<Mutex<HashMap<CallId, Reply>>>;

/// Executes core effects on the engine and feeds results back as [`Msg`]s.
pub struct EffectRunner {
    engine: Arc<EngineHandle>,
    pending: PendingCalls,
    next_call: CallId,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, msg_tx: mpsc::Sender<Msg>) -> Self {
        let runner = Self {
            engine: Arc::new(engine),
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_call: 0,
        };
        runner.spawn_event_loop(msg_tx);
        runner
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            if let Effect::CancelScope { scope } = effect {
                bakery_debug!("CancelScope scope={}", scope);
                self.engine.cancel_scope(scope);
                continue;
            }
            let Some((scope, call, reply)) = translate(effect) else {
                continue;
            };
            self.next_call += 1;
            let call_id = self.next_call;
            bakery_info!("Submitting {} call_id={} scope={}", call.name(), call_id, scope);
            if let Ok(mut pending) = self.pending.lock() {
                pending.insert(call_id, reply);
            }
            self.engine.submit(call_id, scope, call);
        }
    }

    fn spawn_event_loop(&self, msg_tx: mpsc::Sender<Msg>) {
        let engine = self.engine.clone();
        let pending = self.pending.clone();
        thread::spawn(move || loop {
            let Some(event) = engine.try_recv() else {
                thread::sleep(Duration::from_millis(20));
                continue;
            };
            let (call_id, outcome) = match event {
                EngineEvent::Completed {
                    call_id, result, ..
                } => (call_id, Some(result)),
                EngineEvent::Cancelled { call_id, scope } => {
                    bakery_debug!("Call {} dropped with scope {}", call_id, scope);
                    (call_id, None)
                }
            };
            let reply = pending.lock().ok().and_then(|mut map| map.remove(&call_id));
            let (Some(reply), Some(result)) = (reply, outcome) else {
                continue;
            };
            if let Err(err) = &result {
                bakery_warn!("Call {} failed: {}", call_id, err);
            }
            if msg_tx.send(to_msg(reply, result)).is_err() {
                break;
            }
        });
    }
}

/// Maps an effect onto the call that performs it. `CancelScope` has no call.
fn translate(effect: Effect) -> Option<(ScopeId, ApiCall, Reply)> {
    let translated = match effect {
        Effect::Login { email, password } => (
            ROOT_SCOPE,
            ApiCall::Login { email, password },
            Reply::Login,
        ),
        Effect::FetchCustomers { ticket, token } => (
            ticket.scope,
            ApiCall::ListCustomers { token: Some(token) },
            Reply::Customers(ticket),
        ),
        Effect::FetchOrders { ticket, token } => (
            ticket.scope,
            ApiCall::ListOrders { token: Some(token) },
            Reply::Orders(ticket),
        ),
        Effect::CountCustomerOrders {
            ticket,
            customer_id,
            token,
        } => (
            ticket.scope,
            ApiCall::CountCustomerOrders {
                id: customer_id,
                token: Some(token),
            },
            Reply::OrderCount {
                ticket,
                customer_id,
            },
        ),
        Effect::FetchCustomerName {
            ticket,
            order_id,
            customer_id,
            token,
        } => (
            ticket.scope,
            ApiCall::GetCustomer {
                id: customer_id,
                token: Some(token),
            },
            Reply::CustomerName { ticket, order_id },
        ),
        Effect::LoadCustomer {
            ticket,
            customer_id,
            token,
        } => (
            ticket.scope,
            ApiCall::GetCustomer {
                id: customer_id,
                token: Some(token),
            },
            Reply::CustomerForm(ticket),
        ),
        Effect::CreateCustomer { name, age, token } => (
            ROOT_SCOPE,
            ApiCall::CreateCustomer {
                customer: NewCustomer {
                    name: name.clone(),
                    age,
                },
                token: Some(token),
            },
            Reply::CustomerSaved { name },
        ),
        Effect::UpdateCustomer {
            id,
            name,
            age,
            token,
        } => (
            ROOT_SCOPE,
            ApiCall::UpdateCustomer {
                id,
                customer: NewCustomer {
                    name: name.clone(),
                    age,
                },
                token: Some(token),
            },
            Reply::CustomerSaved { name },
        ),
        Effect::DeleteCustomer { id, token } => (
            ROOT_SCOPE,
            ApiCall::DeleteCustomer {
                id,
                token: Some(token),
            },
            Reply::CustomerDeleted(id),
        ),
        Effect::CreateOrder {
            customer_id,
            customer_name,
            flavor,
            quantity,
            size,
            token,
        } => (
            ROOT_SCOPE,
            ApiCall::CreateOrder {
                order: NewOrder {
                    customer_id,
                    flavor,
                    quantity,
                    size: cake_size(size),
                },
                token: Some(token),
            },
            Reply::OrderSaved { customer_name },
        ),
        Effect::SetOrderStatus { id, status, token } => (
            ROOT_SCOPE,
            ApiCall::UpdateOrderStatus {
                id,
                status: status_code(status),
                token: Some(token),
            },
            Reply::StatusChanged(id),
        ),
        Effect::DeleteOrder { id, token } => (
            ROOT_SCOPE,
            ApiCall::DeleteOrder {
                id,
                token: Some(token),
            },
            Reply::OrderDeleted(id),
        ),
        Effect::CancelScope { .. } => return None,
    };
    Some(translated)
}

fn to_msg(reply: Reply, result: Result<ApiReply, RequestError>) -> Msg {
    match reply {
        Reply::Login => Msg::LoginCompleted(match result {
            Ok(ApiReply::Token(response)) => Ok(response.token),
            Ok(other) => Err(LoginRejection::without_flags(unexpected(&other))),
            Err(err) => Err(LoginRejection {
                failure: failure(&err),
                email_flag: err.body_flag("email"),
                password_flag: err.body_flag("senha"),
            }),
        }),
        Reply::Customers(ticket) => Msg::CustomersFetched {
            ticket,
            result: pick(result, |reply| match reply {
                ApiReply::Customers(records) => Ok(records.into_iter().map(customer).collect()),
                other => Err(other),
            }),
        },
        Reply::Orders(ticket) => Msg::OrdersFetched {
            ticket,
            result: pick(result, |reply| match reply {
                ApiReply::Orders(records) => Ok(records.into_iter().map(order).collect()),
                other => Err(other),
            }),
        },
        Reply::OrderCount {
            ticket,
            customer_id,
        } => Msg::OrderCountFetched {
            ticket,
            customer_id,
            result: pick(result, |reply| match reply {
                ApiReply::Count(count) => Ok(count),
                other => Err(other),
            }),
        },
        Reply::CustomerName { ticket, order_id } => Msg::CustomerNameFetched {
            ticket,
            order_id,
            result: pick(result, |reply| match reply {
                ApiReply::Customer(record) => Ok(record.name),
                other => Err(other),
            }),
        },
        Reply::CustomerForm(ticket) => Msg::CustomerLoaded {
            ticket,
            result: pick(result, |reply| match reply {
                ApiReply::Customer(record) => Ok(customer(record)),
                other => Err(other),
            }),
        },
        Reply::CustomerSaved { name } => Msg::CustomerSaved {
            name,
            result: done(result),
        },
        Reply::OrderSaved { customer_name } => Msg::OrderSaved {
            customer_name,
            result: done(result),
        },
        Reply::CustomerDeleted(id) => Msg::CustomerDeleted {
            id,
            result: done(result),
        },
        Reply::OrderDeleted(id) => Msg::OrderDeleted {
            id,
            result: done(result),
        },
        Reply::StatusChanged(id) => Msg::OrderStatusChanged {
            id,
            result: done(result),
        },
    }
}

fn pick<T>(
    result: Result<ApiReply, RequestError>,
    select: impl FnOnce(ApiReply) -> Result<T, ApiReply>,
) -> Result<T, RequestFailure> {
    let reply = result.map_err(|err| failure(&err))?;
    select(reply).map_err(|other| unexpected(&other))
}

fn done(result: Result<ApiReply, RequestError>) -> Result<(), RequestFailure> {
    result.map(|_| ()).map_err(|err| failure(&err))
}

fn failure(err: &RequestError) -> RequestFailure {
    RequestFailure::new(err.status(), err.to_string())
}

fn unexpected(reply: &ApiReply) -> RequestFailure {
    bakery_warn!("Unexpected reply shape: {:?}", reply);
    RequestFailure::new(None, "unexpected reply from server")
}

fn customer(record: CustomerRecord) -> Customer {
    Customer {
        id: record.id,
        name: record.name,
        age: record.age,
    }
}

fn order(record: OrderRecord) -> Order {
    Order {
        id: record.id,
        customer_id: record.customer_id,
        flavor: record.flavor,
        quantity: record.quantity,
        size: match record.size {
            CakeSize::Small => OrderSize::Small,
            CakeSize::Medium => OrderSize::Medium,
            CakeSize::Large => OrderSize::Large,
        },
        timestamp: record.timestamp,
        status: if record.status.is_accepted() {
            OrderStatus::Accepted
        } else {
            OrderStatus::Pending
        },
    }
}

fn cake_size(size: OrderSize) -> CakeSize {
    match size {
        OrderSize::Small => CakeSize::Small,
        OrderSize::Medium => CakeSize::Medium,
        OrderSize::Large => CakeSize::Large,
    }
}

fn status_code(status: OrderStatus) -> StatusCode {
    match status {
        OrderStatus::Pending => StatusCode::PENDING,
        OrderStatus::Accepted => StatusCode::ACCEPTED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bakery_engine::wire::TokenResponse;
    use pretty_assertions::assert_eq;

    fn ticket() -> FetchTicket {
        FetchTicket { scope: 3, seq: 1 }
    }

    #[test]
    fn list_fetches_run_in_the_screen_scope() {
        let (scope, call, reply) = translate(Effect::FetchOrders {
            ticket: ticket(),
            token: "tok".to_string(),
        })
        .unwrap();
        assert_eq!(scope, 3);
        assert_eq!(
            call,
            ApiCall::ListOrders {
                token: Some("tok".to_string())
            }
        );
        assert_eq!(reply, Reply::Orders(ticket()));
    }

    #[test]
    fn mutations_run_in_the_root_scope() {
        let (scope, call, _) = translate(Effect::SetOrderStatus {
            id: 4,
            status: OrderStatus::Accepted,
            token: "tok".to_string(),
        })
        .unwrap();
        assert_eq!(scope, ROOT_SCOPE);
        assert_eq!(
            call,
            ApiCall::UpdateOrderStatus {
                id: 4,
                status: StatusCode::ACCEPTED,
                token: Some("tok".to_string())
            }
        );
        assert!(translate(Effect::CancelScope { scope: 3 }).is_none());
    }

    #[test]
    fn order_count_is_the_number_of_orders() {
        let msg = to_msg(
            Reply::OrderCount {
                ticket: ticket(),
                customer_id: 7,
            },
            Ok(ApiReply::Count(2)),
        );
        assert_eq!(
            msg,
            Msg::OrderCountFetched {
                ticket: ticket(),
                customer_id: 7,
                result: Ok(2),
            }
        );
    }

    #[test]
    fn login_token_is_forwarded() {
        let msg = to_msg(
            Reply::Login,
            Ok(ApiReply::Token(TokenResponse {
                token: Some("abc".to_string()),
            })),
        );
        assert_eq!(msg, Msg::LoginCompleted(Ok(Some("abc".to_string()))));
    }

    #[test]
    fn mismatched_reply_is_a_failure() {
        let msg = to_msg(Reply::Customers(ticket()), Ok(ApiReply::Done));
        match msg {
            Msg::CustomersFetched {
                result: Err(failure),
                ..
            } => assert_eq!(failure.status, None),
            other => panic!("unexpected msg: {other:?}"),
        }
    }
}
