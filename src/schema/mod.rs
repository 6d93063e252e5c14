pub mod attempt;
pub mod notification;
