//! Read-state services. Each `refresh` re-reads the chain and hands back an
//! immutable snapshot; nothing is cached between calls.

mod escrow;
mod gauge;
mod option;
mod rewards;

pub use escrow::*;
pub use gauge::*;
pub use option::*;
pub use rewards::*;
