#![warn(clippy::all, clippy::pedantic, clippy::nursery, rust_2018_idioms)]
#![allow(clippy::missing_errors_doc)]
#![forbid(unsafe_code)]
//! Client for the Cloudinary upload and admin APIs.
//!
//! Parameter objects validate themselves and serialize to key-ordered wire parameters; the
//! [`client::Cloudinary`] client signs or authenticates them and sends them through a blocking or
//! async transport.
pub mod account;
pub mod api;
pub mod client;
pub mod request;
pub mod resource;
pub mod response;
pub mod signature;
pub mod transformation;
pub mod transport;

pub use account::Account;
pub use client::{Cloudinary, Error};
pub use request::params::{ParamMap, ParamValue, Params, ValidationError};
pub use resource::ResourceType;
