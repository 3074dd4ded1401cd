pub mod bot;
pub mod contact;
pub mod extract;
pub mod health;
pub mod login;
pub mod root;
