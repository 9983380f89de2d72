//! Human-facing status lines. They go to stderr: stdout carries the JSON
//! responses of the request surface.

use crate::utils::colors::{BLUE, BOLD, GREEN, RED, RESET, YELLOW};
use std::fmt;

fn line<T: fmt::Display>(color: &str, icon: &str, msg: T) {
    eprintln!("{color}{BOLD}{icon} {RESET}{msg}");
}

pub fn info<T: fmt::Display>(msg: T) {
    line(BLUE, "ℹ️", msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    line(GREEN, "✅", msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    line(YELLOW, "⚠️", msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    line(RED, "❌", msg);
}
