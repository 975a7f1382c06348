pub mod auth;
pub mod bureau;
pub mod hierarchy;
pub mod meeting;
pub mod member;
pub mod scope;
pub mod stats;
