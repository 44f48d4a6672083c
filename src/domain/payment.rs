use super::order::OrderStatus;

/// Assertion from the payment collaborator that the cart has been paid for.
///
/// Order placement never decides payment success itself: the status written
/// for a new order comes from this value, so a caller cannot place an order
/// without first holding one.
///
/// Constructing one is not a verification. The HTTP layer builds it from the
/// request's `paymentMethod` and `transactionId` and trusts that the upstream
/// payment step already succeeded; nothing here checks the transaction id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfirmation {
    method: String,
    transaction_id: String,
}

impl PaymentConfirmation {
    pub fn new(method: Option<String>, transaction_id: Option<String>) -> Self {
        Self {
            method: method.unwrap_or_default(),
            transaction_id: transaction_id.unwrap_or_default(),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    pub fn order_status(&self) -> OrderStatus {
        OrderStatus::Paid
    }
}
