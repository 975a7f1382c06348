pub mod auth;
pub mod bureau;
pub mod hierarchy;
pub mod meetings;
pub mod members;
pub mod stats;
pub mod users;
