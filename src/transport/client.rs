//! Wrapped hyper client.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::transport::body::CountingBody;
use crate::transport::service::TransportLogging;
use crate::transport::wrapper::TransportWrapper;

/// Request body type accepted by [`LoggedClient`].
pub type RequestBody = Full<Bytes>;

/// Underlying hyper client; its request bodies are the counting wrappers.
pub type HttpClient = Client<HttpConnector, CountingBody<RequestBody>>;

/// A hyper client whose exchanges are logged.
pub type LoggedClient = TransportLogging<HttpClient>;

/// Plain HTTP client with the default connector.
pub fn http_client() -> HttpClient {
    Client::builder(TokioExecutor::new()).build(HttpConnector::new())
}

/// Build a client and wrap it.
pub fn logged_client(wrapper: &TransportWrapper) -> LoggedClient {
    wrapper.wrap(http_client())
}
