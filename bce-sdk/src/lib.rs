#![doc = include_str!("../README.md")]

#[cfg(feature = "bos")]
pub mod bos;

/// Credentials related implementations for BCE SDKs
pub mod credentials;
