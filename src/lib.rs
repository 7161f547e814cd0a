//! # GameStream Connection Lifecycle
//!
//! Connection-lifecycle management for a GameStream client: drives a remote
//! host through the fixed sequence of setup stages (platform initialization,
//! name resolution, RTSP handshake, and per-channel stream init/start for
//! control, video, audio and input), supports asynchronous interruption of a
//! pending attempt, and performs exact reverse-order teardown on failure or
//! explicit stop.
//!
//! The protocol machinery itself (handshake wire format, media transports,
//! platform bring-up) lives behind the collaborator traits in [`backend`] and
//! [`resolver`]; this crate only drives their lifecycles.
#![warn(rust_2018_idioms)]
#![allow(dead_code)]

pub mod backend;
pub mod config;
pub mod connection;
pub mod error;
pub mod interrupt;
pub mod resolver;
pub mod stage;

pub use error::{Error, ErrorCode, Result, StageResult};
