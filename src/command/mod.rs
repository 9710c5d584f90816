//! Command module: names, invocations and the command table
//!
//! Each developer command maps statically to one action:
//! - an external [`Invocation`] built from the package manager, or
//! - in-process cleanup for `clean`

pub mod invocation;
pub mod name;
pub mod table;

pub use invocation::{Action, Invocation};
pub use name::{BumpKind, DevCommand};
pub use table::{CommandListing, CommandTable};
