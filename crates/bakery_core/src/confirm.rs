use crate::{CustomerId, OrderId};

/// A destructive action waiting for an explicit yes/no answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    DeleteCustomer {
        id: CustomerId,
        name: String,
    },
    DeleteOrder {
        id: OrderId,
        customer_name: Option<String>,
    },
}

impl PendingAction {
    pub fn title(&self) -> &'static str {
        match self {
            PendingAction::DeleteCustomer { .. } => "Delete customer?",
            PendingAction::DeleteOrder { .. } => "Delete order?",
        }
    }

    pub fn prompt(&self) -> String {
        match self {
            PendingAction::DeleteCustomer { name, .. } => {
                format!("Do you want to delete the customer {name}?")
            }
            PendingAction::DeleteOrder {
                customer_name: Some(name),
                ..
            } if !name.is_empty() => format!("Do you want to delete the order of {name}?"),
            PendingAction::DeleteOrder { id, .. } => {
                format!("Do you want to delete order #{id}?")
            }
        }
    }
}
