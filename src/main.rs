//! # BASIC
//!
//! A line-numbered BASIC in one fixed size arena.
//!
//! Run with no arguments for the prompt, or give a listing file or URL
//! to enter before the prompt appears.

mod term;

fn main() {
    term::main();
}
