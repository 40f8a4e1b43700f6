mod client;


pub use client::{ClientError, ClientResult, PatchServerClient};
