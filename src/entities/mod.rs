pub mod prelude;

pub mod college;
pub mod event;
pub mod event_registration;
pub mod event_review;
pub mod fest;
pub mod password_reset_token;
pub mod payment;
pub mod sea_orm_active_enums;
pub mod student;
pub mod team;
pub mod team_member;
pub mod user;
