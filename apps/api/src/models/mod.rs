pub mod form;
pub mod user;
