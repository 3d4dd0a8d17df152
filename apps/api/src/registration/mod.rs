//! Account sign-up: the role-tagged form, its validation, and the registry.

pub mod handlers;
pub mod models;
pub mod store;
pub mod validation;

pub use store::RegistrationStore;
