pub mod auth;
pub mod budget;
pub mod events;
pub mod family;
pub mod goals;
pub mod health;
pub mod meals;
pub mod messages;
pub mod profile;
pub mod recipes;
pub mod shopping;
pub mod tasks;
