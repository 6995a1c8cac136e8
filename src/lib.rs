pub mod api;
pub mod appliance;
pub mod bus;
pub mod config;
pub mod driver;
pub mod logging;
