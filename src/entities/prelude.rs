pub use super::college::Entity as College;
pub use super::event::Entity as Event;
pub use super::event_registration::Entity as EventRegistration;
pub use super::event_review::Entity as EventReview;
pub use super::fest::Entity as Fest;
pub use super::password_reset_token::Entity as PasswordResetToken;
pub use super::payment::Entity as Payment;
pub use super::student::Entity as Student;
pub use super::team::Entity as Team;
pub use super::team_member::Entity as TeamMember;
pub use super::user::Entity as User;
