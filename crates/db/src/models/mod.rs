pub mod activity;
pub mod category;
pub mod comment;
pub mod quarter;
pub mod user;
