pub mod baggage;
pub mod checkin;
pub mod flight_status;
pub mod gates;
pub mod idgen;
pub mod seats;
