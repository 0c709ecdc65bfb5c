pub mod assignment;
pub mod lead;
pub mod location;
pub mod user;
