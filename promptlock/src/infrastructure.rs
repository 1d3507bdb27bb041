pub mod encoding;
pub mod logging;
