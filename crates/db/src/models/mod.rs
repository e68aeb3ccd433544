//! Database row models and request/response DTOs.

pub mod detection;
pub mod device;
pub mod farmer;
