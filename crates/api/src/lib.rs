//! Command and query interface for a tagging [`Workspace`](tagging::Workspace).
//!
//! Commands are serializable descriptions of the events a map UI delivers
//! (clicks, edit commits, zoom changes, bucket assignments). They can be
//! recorded, replayed from a script, or generated by another tool, and
//! every one of them runs through [`execute_command`].
//!
//! # Example
//! ```ignore
//! use api::{execute_command, Command, ShapeRef};
//!
//! let cmd = Command::Click {
//!     shape: ShapeRef::Member { group: "lotes".into(), index: 0 },
//! };
//! let result = execute_command(&mut workspace, cmd);
//! ```

mod command;
mod error;
mod executor;
mod query;
mod target;

pub use command::*;
pub use error::ApiError;
pub use executor::{execute_command, execute_query};
pub use query::*;
pub use target::*;
