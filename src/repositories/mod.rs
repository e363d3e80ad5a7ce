pub mod college_repository;
pub mod event_registration_repository;
pub mod event_repository;
pub mod event_review_repository;
pub mod fest_repository;
pub mod password_reset_token_repository;
pub mod payment_repository;
pub mod student_repository;
pub mod team_repository;
pub mod user_repository;

pub use college_repository::{CollegeCreate, CollegeRepository, PaymentConfigUpdate};
pub use event_registration_repository::{EventRegistrationRepository, RegistrationCreate};
pub use event_repository::{EventCreate, EventRepository, EventUpdate};
pub use event_review_repository::EventReviewRepository;
pub use fest_repository::{FestCreate, FestRepository, FestUpdate};
pub use password_reset_token_repository::PasswordResetTokenRepository;
pub use payment_repository::{PaymentCreate, PaymentRepository};
pub use student_repository::StudentRepository;
pub use team_repository::{TeamMemberRepository, TeamRepository};
pub use user_repository::UserRepository;
