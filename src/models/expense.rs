use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    PartiallyPaid,
    Settled,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::PartiallyPaid => "Partially Paid",
            Self::Settled => "Settled",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "settled" | "paid" | "pago" | "quitado" => Self::Settled,
            "partially paid" | "partial" | "parcial" => Self::PartiallyPaid,
            _ => Self::Pending,
        }
    }

    pub fn all() -> &'static [PaymentStatus] {
        &[Self::Pending, Self::PartiallyPaid, Self::Settled]
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub item: String,
    pub category: String,
    pub budgeted: Decimal,
    pub paid: Decimal,
    pub status: PaymentStatus,
}

impl Expense {
    pub fn new(
        item: String,
        category: String,
        budgeted: Decimal,
        paid: Decimal,
        status: PaymentStatus,
    ) -> Self {
        Self {
            item,
            category,
            budgeted,
            paid,
            status,
        }
    }

    /// Still owed on this item. Negative when overpaid; not clamped.
    pub fn outstanding(&self) -> Decimal {
        self.budgeted - self.paid
    }

    pub fn is_settled(&self) -> bool {
        self.status == PaymentStatus::Settled
    }
}
