pub mod embed;
pub mod message;
pub mod user;
