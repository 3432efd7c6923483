pub mod chain;
pub mod contracts;
pub mod prelude;
pub mod test;
