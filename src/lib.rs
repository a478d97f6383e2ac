//! # Arena BASIC
//!
//! A small line-numbered BASIC for machines with a few kilobytes of RAM.
//! Program text, the evaluation stack, variables and GOSUB frames all
//! share one fixed size arena, so a program can never use more memory
//! than it was given.
//!
//! ```
//! use basic::mach::{Host, Runtime};
//!
//! #[derive(Default)]
//! struct Screen(String);
//!
//! impl Host for Screen {
//!     fn output_char(&mut self, ch: u8) {
//!         self.0.push(ch as char);
//!     }
//!     fn new_line(&mut self) {
//!         self.0.push('\n');
//!     }
//!     fn read_line(&mut self) -> String {
//!         String::new()
//!     }
//! }
//!
//! let mut runtime = Runtime::<Screen>::default();
//! runtime.enter("10 FOR I=1 TO 3:PRINT I;:NEXT I").unwrap();
//! runtime.enter("RUN").unwrap();
//! assert_eq!(runtime.host().0, "123");
//! ```
//!
//! Lines are tokenized by [`lang`] and run by [`mach`]. The terminal
//! front end lives in the `basic` binary.

#[path = "doc/introduction.rs"]
#[allow(non_snake_case)]
pub mod _Introduction;

pub mod lang;
pub mod mach;
