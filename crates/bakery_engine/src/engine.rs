use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use bakery_logging::{bakery_debug, bakery_info};
use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::wire::{Credentials, CustomerUpdate, StatusUpdate};
use crate::{ApiCall, ApiReply, CallId, EngineEvent, RequestError, ScopeId};

/// Calls in this scope are never cancelled.
pub const ROOT_SCOPE: ScopeId = 0;

enum EngineCommand {
    Call {
        call_id: CallId,
        scope: ScopeId,
        call: ApiCall,
    },
    CancelScope(ScopeId),
}

/// Runs API calls on a background tokio runtime and hands results back over a
/// channel, so the caller's single thread of control never blocks on IO.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Mutex<mpsc::Receiver<EngineEvent>>,
}

impl EngineHandle {
    pub fn new(client: Arc<dyn ApiClient>) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("bakery-engine")
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let mut scopes: HashMap<ScopeId, CancellationToken> = HashMap::new();
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Call {
                        call_id,
                        scope,
                        call,
                    } => {
                        let cancel = scopes.entry(scope).or_default().clone();
                        let client = client.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            run_call(client.as_ref(), call_id, scope, call, cancel, event_tx)
                                .await;
                        });
                    }
                    EngineCommand::CancelScope(scope) => {
                        if scope == ROOT_SCOPE {
                            continue;
                        }
                        if let Some(token) = scopes.remove(&scope) {
                            bakery_debug!("Cancelling scope {}", scope);
                            token.cancel();
                        }
                    }
                }
            }
            bakery_info!("Engine command channel closed; shutting down runtime");
        });

        Ok(Self {
            cmd_tx,
            event_rx: Mutex::new(event_rx),
        })
    }

    pub fn submit(&self, call_id: CallId, scope: ScopeId, call: ApiCall) {
        let _ = self.cmd_tx.send(EngineCommand::Call {
            call_id,
            scope,
            call,
        });
    }

    /// Aborts every in-flight call of `scope`. The root scope is ignored.
    pub fn cancel_scope(&self, scope: ScopeId) {
        let _ = self.cmd_tx.send(EngineCommand::CancelScope(scope));
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }
}

async fn run_call(
    client: &dyn ApiClient,
    call_id: CallId,
    scope: ScopeId,
    call: ApiCall,
    cancel: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let name = call.name();
    bakery_debug!("Call {} ({}) started in scope {}", call_id, name, scope);
    let event = tokio::select! {
        _ = cancel.cancelled() => {
            bakery_debug!("Call {} ({}) cancelled", call_id, name);
            EngineEvent::Cancelled { call_id, scope }
        }
        result = execute(client, call) => EngineEvent::Completed { call_id, scope, result },
    };
    let _ = event_tx.send(event);
}

/// Issues one call against `client` and wraps its parsed body.
pub async fn execute(client: &dyn ApiClient, call: ApiCall) -> Result<ApiReply, RequestError> {
    match call {
        ApiCall::Login { email, password } => client
            .login(&Credentials { email, password })
            .await
            .map(ApiReply::Token),
        ApiCall::ListCustomers { token } => client
            .list_customers(token.as_deref())
            .await
            .map(ApiReply::Customers),
        ApiCall::GetCustomer { id, token } => client
            .get_customer(id, token.as_deref())
            .await
            .map(ApiReply::Customer),
        ApiCall::CreateCustomer { customer, token } => client
            .create_customer(&customer, token.as_deref())
            .await
            .map(|()| ApiReply::Done),
        ApiCall::UpdateCustomer {
            id,
            customer,
            token,
        } => {
            let update = CustomerUpdate {
                id,
                name: customer.name,
                age: customer.age,
            };
            client
                .update_customer(&update, token.as_deref())
                .await
                .map(|()| ApiReply::Done)
        }
        ApiCall::DeleteCustomer { id, token } => client
            .delete_customer(id, token.as_deref())
            .await
            .map(|()| ApiReply::Done),
        ApiCall::CountCustomerOrders { id, token } => client
            .count_customer_orders(id, token.as_deref())
            .await
            .map(ApiReply::Count),
        ApiCall::ListOrders { token } => client
            .list_orders(token.as_deref())
            .await
            .map(ApiReply::Orders),
        ApiCall::CreateOrder { order, token } => client
            .create_order(&order, token.as_deref())
            .await
            .map(|()| ApiReply::Done),
        ApiCall::UpdateOrderStatus { id, status, token } => client
            .update_order_status(&StatusUpdate { id, status }, token.as_deref())
            .await
            .map(|()| ApiReply::Done),
        ApiCall::DeleteOrder { id, token } => client
            .delete_order(id, token.as_deref())
            .await
            .map(|()| ApiReply::Done),
    }
}
