/*!
## Rust Machine Module

This Rust module is the BASIC interpreter. Program text, the evaluation
stack, variables and gosub frames all share one fixed size arena.

*/

mod arena;
mod expr;
mod function;
mod gosub;
mod host;
mod listing;
mod operation;
mod program;
mod runtime;
mod stack;
mod statement;
mod var;

pub use arena::{Arena, Regions, MEMORY_SIZE};
pub use expr::Type;
pub use function::Function;
pub use host::{format_float, Host};
pub use listing::list_tokens;
pub use operation::Operation;
pub use runtime::{Runtime, AUTORUN};
pub use var::{ForNext, Kind};
