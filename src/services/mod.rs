pub mod guard;
pub mod login;
pub mod normalize;
pub mod submission;
pub mod validation;
