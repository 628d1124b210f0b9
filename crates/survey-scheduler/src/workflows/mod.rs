pub mod register;
pub mod survey;
