pub mod category;
pub mod submission;
pub mod user;

pub use category::{Column, FormField, InputKind, SubmissionType};
pub use submission::{Applicant, StatusHistory, Submission};
pub use user::{ASSIGNABLE_ROLES, DashboardStats, Role, User, Village};
