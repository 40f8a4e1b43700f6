pub(crate) mod client;
pub(crate) mod error;
pub(crate) mod wire;

pub use client::PatchServerClient;
pub use error::{ClientError, Result as ClientResult};
