pub mod candidate;
pub mod credentials;
pub mod reservation;
pub mod snapshot;
