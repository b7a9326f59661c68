pub mod export;
pub mod progression;
pub mod server;
