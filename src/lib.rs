//! Deploys issued TLS certificates to Tencent Cloud CDN instances.
//!
//! The flow is upload, resolve targets, then bind: see [`deployer::TencentCdnDeployer`].

pub mod config;
pub mod deployer;
pub mod error;
pub mod observability;
pub mod provider;
pub mod tls;

pub use deployer::{Deployer, TencentCdnDeployer};
pub use error::{CertificateError, DeployError, QueryError};
