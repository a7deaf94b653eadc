//! Backend transport for the Loft client.
//!
//! Every backend operation the session core drives is a named route with a
//! JSON body. The [`Gateway`] trait is that contract; [`HttpGateway`] is
//! the shipped HTTP implementation.

pub mod client;
pub mod error;

pub use client::{Gateway, HttpGateway, Route};
pub use error::ApiError;
