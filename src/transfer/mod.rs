// ============================================================================
// Transfer Module
// Single-use transfers of money and goods, and the transaction pairing them
// ============================================================================

mod marketed_transfer;
mod result;
mod transaction;
mod wealth_transfer;

pub use marketed_transfer::MarketedTransfer;
pub use result::{MarketedTransferResult, TransactionResult, WealthTransferResult};
pub use transaction::{Transaction, TransactionId};
pub use wealth_transfer::WealthTransfer;
