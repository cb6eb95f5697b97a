pub mod constants;
pub mod offstreet;
pub mod session;
pub mod t2;
pub mod wait;
