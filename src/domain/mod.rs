pub mod address;
pub mod availability;
pub mod forms;
pub mod location;
pub mod patient;
pub mod provider;
pub mod user;

pub use address::Address;
pub use availability::{
    AvailabilityForm, AvailabilityInput, AvailabilitySlot, AvailabilityType, DayOfWeek, RepeatType,
};
pub use forms::FieldErrors;
pub use location::Location;
pub use patient::Patient;
pub use provider::Provider;
pub use user::{AuthUser, Credentials, Role};
