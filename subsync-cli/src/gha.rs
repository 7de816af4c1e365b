//! CI log markers.
//!
//! `::group::` / `::endgroup::` pairs fold a phase in the CI log viewer;
//! `::info::` / `::debug::` / `::error::{kind}::{msg}` carry the level.
//! Plain text on stdout, not a machine-readable contract.

use std::fmt::Display;

pub fn group(title: &str) {
    println!("::group::{title}");
}

pub fn end_group() {
    println!("::endgroup::");
}

pub fn info(message: impl Display) {
    println!("::info::{message}");
}

pub fn debug(message: impl Display) {
    println!("::debug::{message}");
}

pub fn error(kind: &str, message: impl Display) {
    println!("::error::{kind}::{message}");
}
