// Tank-drive runtime: slewed arcade drive plus a motor thermal monitor

pub mod config;
pub mod display;
pub mod drive;
pub mod error;
pub mod messages;
pub mod motor;
pub mod ports;
pub mod runtime;
pub mod sim;
pub mod thermal;
