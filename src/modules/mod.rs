pub mod applications;
pub mod auth;
pub mod coins;
pub mod events;
pub mod notifications;
pub mod opportunities;
pub mod organizations;
pub mod professors;
pub mod reports;
pub mod students;
pub mod tags;
