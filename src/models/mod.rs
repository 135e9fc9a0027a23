mod expense;
mod guest;

pub use expense::{Expense, PaymentStatus};
pub use guest::{Attendance, Guest, MAX_COMPANIONS};
