//! Data store: values, bindings and named handlers.

pub mod model;
pub mod value;

pub use model::{Binding, DataModel, Handler, Proxy};
pub use value::{Choice, Value};
