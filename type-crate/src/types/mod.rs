pub mod allowance;
pub mod amount;
pub mod escrow;
pub mod gauge;

pub use allowance::*;
pub use amount::*;
pub use escrow::*;
pub use gauge::*;
