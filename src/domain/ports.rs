use super::errors::DomainError;
use super::order::{NewOrder, OrderSummary, OrderView};

pub trait OrderRepository: Send + Sync + 'static {
    /// Writes the order and every line as one transaction and returns the
    /// generated order id. Nothing is persisted when this returns `Err`.
    fn create(&self, order: &NewOrder) -> Result<i32, DomainError>;
    fn find_by_id(&self, id: i32) -> Result<Option<OrderView>, DomainError>;
    fn history_for_user(&self, user_id: i32) -> Result<Vec<OrderSummary>, DomainError>;
}
