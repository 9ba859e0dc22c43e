pub mod check;
pub mod completions;
pub mod config;
pub mod hook;
pub mod skill;
