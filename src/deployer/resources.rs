use tracing::debug;

use crate::error::QueryError;
use crate::provider::{CdnCertificateApi, DescribeDeployedResourcesRequest, RESOURCE_TYPE_CDN};

/// List the CDN instances currently bound to `certificate_id`.
///
/// An empty resource-group list from the provider is reported as
/// `QueryError::NoResourceGroups` rather than an empty result; callers decide
/// how to treat it.
pub async fn list_deployed_instances(
    api: &dyn CdnCertificateApi,
    certificate_id: &str,
) -> Result<Vec<String>, QueryError> {
    let response = api
        .describe_deployed_resources(DescribeDeployedResourcesRequest {
            certificate_ids: vec![certificate_id.to_string()],
            resource_type: RESOURCE_TYPE_CDN.to_string(),
        })
        .await
        .map_err(QueryError::Transport)?;

    let group = response
        .deployed_resources
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or(QueryError::NoResourceGroups)?;

    let instances = group.resources.or(group.instance_id_list).unwrap_or_default();

    debug!(
        "Certificate {} is deployed to {} CDN instance(s)",
        certificate_id,
        instances.len()
    );

    Ok(instances)
}
