//! Certificate deployment: upload, target resolution and binding

pub mod executor;
pub mod option;
pub mod previous;
pub mod resolver;
pub mod resources;
pub mod tencent_cdn;
pub mod upload;

pub use option::{AccessRecord, CertificateBundle, DeployConfig, DeployerOption, TencentAccess};
pub use resolver::{resolve, DomainSpec, Resolution, TargetSet};
pub use tencent_cdn::{DeployState, TencentCdnDeployer};

use async_trait::async_trait;
use serde::Serialize;

use crate::error::DeployError;

/// Caller-facing surface of a deployer
#[async_trait]
pub trait Deployer: Send {
    /// Identifier for logging and correlation: access record name and id
    fn id(&self) -> String;

    /// Progress log accumulated so far
    fn info(&self) -> &[String];

    async fn deploy(&mut self) -> Result<(), DeployError>;
}

/// Format a log entry as `tag: <json>`
pub fn format_info<T: Serialize + ?Sized>(tag: &str, data: &T) -> String {
    let json = serde_json::to_string(data).unwrap_or_else(|_| "<unserializable>".to_string());
    format!("{}: {}", tag, json)
}
