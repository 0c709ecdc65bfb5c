pub mod assignments;
pub mod auth;
pub mod leads;
pub mod locations;
pub mod reports;
pub mod users;
