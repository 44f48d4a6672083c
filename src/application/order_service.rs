use crate::domain::errors::DomainError;
use crate::domain::order::{NewOrder, OrderDraft, OrderSummary, OrderView, PlacedOrder};
use crate::domain::payment::PaymentConfirmation;
use crate::domain::ports::OrderRepository;

pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates the cart snapshot and writes it as a single transaction.
    ///
    /// Invalid input is rejected before the repository is touched, so no
    /// connection is checked out for it. Failures are never retried here.
    pub fn place_order(
        &self,
        draft: OrderDraft,
        payment: PaymentConfirmation,
    ) -> Result<PlacedOrder, DomainError> {
        let order = NewOrder::from_draft(draft, payment).inspect_err(|e| {
            log::warn!("Rejected order: {}", e);
        })?;

        let id = self.repo.create(&order)?;
        log::info!(
            "Placed order {} with {} line(s), total {}",
            id,
            order.lines.len(),
            order.total
        );

        Ok(PlacedOrder {
            id,
            status: order.status(),
        })
    }

    pub fn get_order(&self, id: i32) -> Result<Option<OrderView>, DomainError> {
        self.repo.find_by_id(id)
    }

    pub fn order_history(&self, user_id: i32) -> Result<Vec<OrderSummary>, DomainError> {
        self.repo.history_for_user(user_id)
    }
}
