#![cfg_attr(not(test), no_std)]

pub mod float_utils;
pub use float_utils::*;

pub mod attitude;
pub use attitude::*;

pub mod vector;
pub use vector::*;

#[cfg(test)]
mod tests;

pub const DEG_TO_RAD: f32 = 0.0174533;

pub const RAD_TO_DEG: f32 = 57.29578;
