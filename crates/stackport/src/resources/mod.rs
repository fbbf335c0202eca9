//! Resource accessors, one module per resource kind

pub mod action;
pub mod backup;
pub mod env_var;
pub mod firewall;
pub mod setting;
pub mod stack;
