pub mod reader;
pub mod request;

use crate::error::MarketError;

/// Rejects a length prefix above its hard limit. Called before any allocation.
pub(crate) fn check_limit(count: u32, limit: u32) -> Result<(), MarketError> {
    if count > limit {
        return Err(MarketError::LimitExceeded(count, limit));
    }
    Ok(())
}

/// Length of a collection as a wire u32, rejecting anything above `limit`.
pub(crate) fn wire_len(len: usize, limit: u32) -> Result<u32, MarketError> {
    let count = u32::try_from(len).map_err(|_| MarketError::LimitExceeded(u32::MAX, limit))?;
    check_limit(count, limit)?;
    Ok(count)
}
