#![warn(clippy::pedantic)]
pub mod builder;
pub mod configuration;
pub(crate) mod enums_impl;
pub mod errors;
pub mod hardware;
pub mod info;
pub mod nodes;
pub(crate) mod nodes_impl;
pub mod visitor;
