pub mod accounts;
pub mod cases;
pub mod clients;
pub mod documents;
pub mod lawyers;
pub mod roles;
pub mod user_roles;
pub mod users;
