pub mod dashboard;
pub mod health;
pub mod projects;
pub mod resources;
