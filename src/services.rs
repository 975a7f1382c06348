pub mod access_service;
pub mod auth;
pub mod bureau_service;
pub mod hierarchy_service;
pub mod meeting_service;
pub mod member_service;
pub mod stats_service;
