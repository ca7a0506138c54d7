//! # ESRun
//!
//! Drives a host application's scripting engine from Rust. Host objects are
//! reached through proxies: local handles that forward member access, calls
//! and indexing to the host as single expressions over a [`Transport`].
//!
//! ```no_run
//! use esrun::Remote;
//! use esrun::Session;
//! use esrun::StreamTransport;
//! use esrun::capability::Indexable;
//!
//! # fn main() -> esrun::Result<()> {
//! let session = Session::new(StreamTransport::connect("127.0.0.1:7300")?);
//! let project = session.app()?.project()?;
//! let items = project.get("items")?.into_object()?.into_collection()?;
//! for item in items.iter() {
//!     println!("{}", item?.into_object()?.get("name")?.as_str()?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod builder;
pub mod capability;
pub mod classes;
pub mod collection;
pub mod error;
pub mod function;
pub mod object;
pub mod proxy;
pub mod session;
pub mod stream;
pub mod transport;
pub mod value;

pub use app::Application;
pub use app::UndoGroup;
pub use builder::SessionBuilder;
pub use capability::Remote;
pub use classes::ClassTable;
pub use collection::Collection;
pub use error::Error;
pub use error::Result;
pub use function::Function;
pub use function::Method;
pub use object::Object;
pub use proxy::Proxy;
pub use session::Session;
pub use stream::StreamTransport;
pub use transport::Transport;
pub use value::Value;

pub use esrpc::Dialect;
pub use esrpc::ObjectId;

#[cfg(test)]
mod mock_transport;
