//! Application layer - Host contract, ports and the investigation controller

pub mod dto;
pub mod ports;
pub mod services;
