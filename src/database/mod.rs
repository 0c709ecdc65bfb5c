pub mod assignments;
pub mod leads;
pub mod locations;
pub mod manager;
pub mod models;
pub mod reports;
pub mod users;
