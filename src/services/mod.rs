pub mod auth;
pub mod catalog;
pub mod certificate;
pub mod dashboard;
pub mod explore;
pub mod file_storage;
pub mod moderation;
pub mod notification;
pub mod payment;
pub mod payment_gateway;
pub mod registration;
pub mod reminder;
pub mod review;
