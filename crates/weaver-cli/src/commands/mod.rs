pub mod account;
pub mod edit;
pub mod project;
