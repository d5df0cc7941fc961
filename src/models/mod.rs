pub mod dashboard;
pub mod settings;
pub mod task;
pub mod user;

pub use dashboard::{DashboardSummary, StatusCounts};
pub use settings::{Settings, SettingsUpdate, Theme};
pub use task::{Task, TaskInput, TaskPriority, TaskQuery, TaskStatus};
pub use user::{
    LoginRequest, NewUser, ProfileChanges, ProfileUpdate, SignupRequest, UpdatePasswordRequest,
    User, UserRole,
};
