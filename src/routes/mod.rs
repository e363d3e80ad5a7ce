pub mod admin;
pub mod auth;
pub mod college;
pub mod common;
pub mod events;
pub mod explore;
pub mod fests;
pub mod health;
pub mod payments;
pub mod reviews;
pub mod student;
