#![deny(warnings)]

pub mod config;
pub mod ring_buffer;

pub use ring_buffer::{OverflowCause, RingBuffer, RingBufferError};
