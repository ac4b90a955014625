use google_sheets4::hyper;
use google_sheets4::oauth2::{
    self,
    authenticator::{Authenticator, HyperClientBuilder},
};
use thiserror::Error;
use tracing::instrument;

use crate::adapters::config::sheets_config::SpreadsheetConfig;

/// The only permission ever requested: read-only access to spreadsheets.
pub const SPREADSHEETS_READONLY: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("could not load service account key at '{path}': {reason}")]
pub struct CredentialError {
    pub path: String,
    pub reason: String,
}

/// A service-account authenticator bound to [`SPREADSHEETS_READONLY`].
///
/// Built for one fetch and dropped with it; tokens are never shared between invocations.
pub struct Credential<C> {
    authenticator: Authenticator<C>,
}

impl<C> Credential<C> {
    pub fn scope(&self) -> &'static str {
        SPREADSHEETS_READONLY
    }

    pub fn into_authenticator(self) -> Authenticator<C> {
        self.authenticator
    }
}

impl<C> std::fmt::Debug for Credential<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credential {{ scope: {:?} }}", SPREADSHEETS_READONLY)
    }
}

/// Reads the service-account key named by `config.priv_key` and builds an authenticator on top
/// of `client`, which may use any connector the authenticator accepts. Missing files, malformed keys and unusable private keys all fail the same way.
#[instrument(skip(client))]
pub async fn load_credentials<C>(
    config: &SpreadsheetConfig,
    client: hyper::Client<C>,
) -> error_stack::Result<Credential<C>, CredentialError>
where
    hyper::Client<C>: HyperClientBuilder<Connector = C>,
{
    let priv_key_path: &str = config.priv_key.as_ref();
    let fail = |reason: std::io::Error| {
        let err = CredentialError {
            path: priv_key_path.to_string(),
            reason: reason.to_string(),
        };
        tracing::error!("Error loading credentials: {}", err);
        error_stack::report!(err)
    };

    let secret: oauth2::ServiceAccountKey = oauth2::read_service_account_key(priv_key_path)
        .await
        .map_err(fail)?;

    let authenticator = oauth2::ServiceAccountAuthenticator::with_client(secret, client)
        .build()
        .await
        .map_err(fail)?;

    Ok(Credential { authenticator })
}
