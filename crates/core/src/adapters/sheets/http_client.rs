use error_stack::ResultExt;
use google_sheets4::{hyper, hyper_rustls};
use thiserror::Error;

pub type HttpsConnector = hyper_rustls::HttpsConnector<hyper::client::HttpConnector>;
pub type HttpClient = hyper::Client<HttpsConnector>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("could not build HTTPS client")]
pub struct HttpClientError;

/// HTTPS client shared by the authenticator and the Sheets hub of a single fetch.
///
/// Fails when the platform trust store holds no usable root certificates.
pub fn http_client() -> error_stack::Result<HttpClient, HttpClientError> {
    let connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_native_roots()
        .change_context(HttpClientError)
        .attach_printable("no native root certificates could be loaded")?
        .https_only()
        .enable_http1()
        .build();

    Ok(hyper::Client::builder().build(connector))
}
