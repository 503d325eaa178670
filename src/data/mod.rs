pub mod activity;
pub mod teacher;
