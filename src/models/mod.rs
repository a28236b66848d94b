pub mod auth;
pub mod budget;
pub mod event;
pub mod family;
pub mod goal;
pub mod meal;
pub mod message;
pub mod recipe;
pub mod shopping;
pub mod task;
pub mod user;
