#![forbid(unsafe_code)]

//! Runtime: the single-threaded loop wiring input, arbitration, and render.

pub mod controller;
pub mod focus;
pub mod navigator;
pub mod program;
pub mod router;
pub mod schedule;
pub mod terminal;
