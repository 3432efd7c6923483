pub mod constants;
pub mod time;
pub mod types;
pub mod validation;
pub mod voting_power;

pub use voting_power::{get_voting_power, voting_power_at};
