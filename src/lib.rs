pub mod combine;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod observer;
pub mod output;
pub mod parser;
pub mod record;
pub mod utility;
