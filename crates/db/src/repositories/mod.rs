mod attendee_settings_repo;
mod category_repo;
mod event_repo;

pub use attendee_settings_repo::AttendeeSettingsRepo;
pub use category_repo::CategoryRepo;
pub use event_repo::EventRepo;
