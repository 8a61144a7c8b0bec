pub mod events;
pub mod frames;
pub mod reports;
pub mod sessions;
pub mod statistics;
