//! Request dispatch for the Mastodon REST API.
//!
//! Every operation module funnels through [`Dispatcher::dispatch`], the
//! single call boundary of the client. The dispatcher resolves credentials,
//! builds the HTTP request, submits the network call to the shared
//! [`tootline_queue::RequestQueue`], interprets the response (updating the
//! rate-limit budget from upstream headers and caching GET bodies), and
//! classifies failures into retryable and terminal errors.

mod credentials;
mod dispatcher;
mod options;

pub use credentials::Credentials;
pub use dispatcher::{Dispatcher, Query};
pub use options::{RequestOptions, Upload};

pub use reqwest::Method;
