pub use crate::chain::*;
pub use crate::contracts::*;
pub use crate::test::*;
