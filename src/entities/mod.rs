pub mod baggage;
pub mod booking;
pub mod flight;
pub mod gate;
pub mod user;
