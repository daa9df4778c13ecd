//! Shared utility modules used across ksketch components.

pub mod simd;
