//! Cloud provider abstraction for certificate upload and CDN deployment

pub mod tencent;
pub mod types;

pub use tencent::TencentCloudClient;
pub use types::*;

use anyhow::Result;
use async_trait::async_trait;

/// Remote calls the deployer needs from the provider.
///
/// Each call is a single request/response round trip; implementations do not
/// retry.
#[async_trait]
pub trait CdnCertificateApi: Send + Sync {
    /// Store a certificate/key pair and return its id
    async fn upload_certificate(
        &self,
        request: UploadCertificateRequest,
    ) -> Result<UploadCertificateResponse>;

    /// Bind a stored certificate to a list of instances
    async fn deploy_certificate_instance(
        &self,
        request: DeployCertificateInstanceRequest,
    ) -> Result<DeployCertificateInstanceResponse>;

    /// List the CDN domains a certificate covers
    async fn describe_cert_domains(
        &self,
        request: DescribeCertDomainsRequest,
    ) -> Result<DescribeCertDomainsResponse>;

    /// List the resources currently bound to certificates
    async fn describe_deployed_resources(
        &self,
        request: DescribeDeployedResourcesRequest,
    ) -> Result<DescribeDeployedResourcesResponse>;

    /// Get provider name for logging
    fn provider_name(&self) -> &str;
}
