// Thu Oct 15 2026 - Alex

pub mod logging;

pub use logging::LoggingUtils;
