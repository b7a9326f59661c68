pub mod progression;

pub use progression::{first_round_updates, knockout_round_updates};
