pub mod auth;
pub mod family;
pub mod rate_limit;
