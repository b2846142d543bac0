pub type CustomerId = u64;
pub type OrderId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub age: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderSize {
    #[default]
    Small,
    Medium,
    Large,
}

impl OrderSize {
    pub const ALL: [OrderSize; 3] = [OrderSize::Small, OrderSize::Medium, OrderSize::Large];

    pub fn label(self) -> &'static str {
        match self {
            OrderSize::Small => "SMALL",
            OrderSize::Medium => "MEDIUM",
            OrderSize::Large => "LARGE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Accepted,
}

impl OrderStatus {
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Accepted => "ACCEPTED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub flavor: String,
    pub quantity: u32,
    pub size: OrderSize,
    /// Creation time in unix seconds.
    pub timestamp: i64,
    pub status: OrderStatus,
}

/// A failed remote call, reduced to what the orchestration layer acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFailure {
    /// HTTP status when the server answered; `None` for transport failures.
    pub status: Option<u16>,
    pub message: String,
}

impl RequestFailure {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}
