// ============================================================================
// Interfaces Module
// Contains all trait definitions and contracts
// ============================================================================

mod event_handler;
mod market;
mod matching_algorithm;

pub use event_handler::{
    ChannelEventHandler, EventHandler, LoggingEventHandler, MarketEvent, NoOpEventHandler,
};
pub use market::Market;
pub use matching_algorithm::MatchingAlgorithm;
