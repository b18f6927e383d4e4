pub mod admin;
pub mod auth;
pub mod baggage;
pub mod board;
pub mod checkin;
pub mod gates;
pub mod info;
