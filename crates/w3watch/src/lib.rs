pub mod collector;
pub mod config;
pub mod identity;
pub mod logging;
pub mod metrics;
pub mod normalize;
pub mod resolver;
pub mod source;
