use anyhow::anyhow;
use tracing::info;

use super::resolver::TargetSet;
use crate::error::DeployError;
use crate::provider::{
    CdnCertificateApi, DeployCertificateInstanceRequest, DeployCertificateInstanceResponse,
    RESOURCE_TYPE_CDN,
};

/// Enable HTTPS on the target instances
const DEPLOY_STATUS_ENABLE: i64 = 1;

/// Bind `certificate_id` to every instance in `targets` with one bulk request.
///
/// The provider applies the binding per instance; partial success shows up in
/// the returned response and is not re-checked here.
pub async fn execute(
    api: &dyn CdnCertificateApi,
    certificate_id: &str,
    targets: &TargetSet,
) -> Result<DeployCertificateInstanceResponse, DeployError> {
    if targets.is_empty() {
        return Err(DeployError::Deploy(anyhow!("empty target set")));
    }

    info!(
        "Deploying certificate {} to {} CDN instance(s)",
        certificate_id,
        targets.len()
    );

    api.deploy_certificate_instance(DeployCertificateInstanceRequest {
        certificate_id: certificate_id.to_string(),
        instance_id_list: targets.as_slice().to_vec(),
        resource_type: RESOURCE_TYPE_CDN.to_string(),
        status: DEPLOY_STATUS_ENABLE,
    })
    .await
    .map_err(DeployError::Deploy)
}
