pub mod constants;
pub mod frame;
pub mod http;
pub mod jpeg;
pub mod records;
