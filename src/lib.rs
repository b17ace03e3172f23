pub mod app_config;
pub mod dashboard;
pub mod domain;
mod extensions;
pub mod form;
pub mod list;
pub mod remote;
pub mod session;
