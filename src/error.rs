//! Error types for certificate parsing and deployment

use thiserror::Error;

/// Errors raised while parsing or encoding certificates and private keys
#[derive(Debug, Error)]
pub enum CertificateError {
    /// No usable PEM block was found in the input
    #[error("malformed PEM: no matching PEM block found")]
    MalformedPem,

    #[error("malformed certificate: {0}")]
    MalformedCertificate(String),

    #[error("malformed private key: {0}")]
    MalformedPrivateKey(String),

    #[error("failed to serialize private key: {0}")]
    Serialize(String),
}

/// Failure while asking the provider which resources serve a certificate
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("failed to describe deployed resources")]
    Transport(#[source] anyhow::Error),

    /// The provider answered with an empty resource-group list
    #[error("no resource groups returned")]
    NoResourceGroups,
}

/// Errors surfaced by a single deployment attempt.
///
/// Every variant is terminal for the `deploy` call that produced it.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("failed to decode provider credential")]
    Config(#[source] anyhow::Error),

    #[error("failed to upload certificate")]
    Upload(#[source] anyhow::Error),

    #[error("failed to get deployed resources")]
    Query(#[from] QueryError),

    #[error("failed to get certificate domain list")]
    Resolve(#[source] anyhow::Error),

    #[error("failed to deploy")]
    Deploy(#[source] anyhow::Error),

    /// The deploy config names no CDN domain to deploy to
    #[error("deploy config has no CDN domain")]
    MissingDomain,

    #[error("deployer has already run")]
    AlreadyUsed,
}
