//! Decides which CDN instances still need the certificate

use anyhow::Context;
use tracing::{debug, info};

use super::resources::list_deployed_instances;
use crate::error::{DeployError, QueryError};
use crate::provider::{CdnCertificateApi, DescribeCertDomainsRequest};

const WILDCARD_MARKER: char = '*';

/// Requested CDN domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainSpec {
    /// A single concrete domain
    Exact(String),
    /// A domain with a wildcard label, expanded through the certificate's domain list
    Wildcard(String),
}

impl DomainSpec {
    /// Classify `domain`; a blank value names no target and is rejected
    pub fn parse(domain: &str) -> Result<Self, DeployError> {
        let domain = domain.trim();
        if domain.is_empty() {
            return Err(DeployError::MissingDomain);
        }
        if domain.contains(WILDCARD_MARKER) {
            Ok(DomainSpec::Wildcard(domain.to_string()))
        } else {
            Ok(DomainSpec::Exact(domain.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DomainSpec::Exact(d) | DomainSpec::Wildcard(d) => d,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, DomainSpec::Wildcard(_))
    }
}

/// Instances that still need the certificate, in provider order without duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSet(Vec<String>);

impl TargetSet {
    /// `candidates` minus `deployed`, keeping candidate order
    pub fn subtract(candidates: impl IntoIterator<Item = String>, deployed: &[String]) -> Self {
        let mut targets: Vec<String> = Vec::new();
        for candidate in candidates {
            if !deployed.contains(&candidate) && !targets.contains(&candidate) {
                targets.push(candidate);
            }
        }
        TargetSet(targets)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

/// Outcome of target resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Deploy(TargetSet),
    /// Exact domain is already bound to the certificate
    AlreadyDeployed,
    /// Wildcard expansion left nothing to bind
    NothingToDeploy,
}

/// Deployed instances, treating an empty resource-group list as "none yet"
async fn deployed_instances(
    api: &dyn CdnCertificateApi,
    certificate_id: &str,
) -> Result<Vec<String>, DeployError> {
    match list_deployed_instances(api, certificate_id).await {
        Ok(instances) => Ok(instances),
        Err(QueryError::NoResourceGroups) => {
            debug!("No resource groups for certificate {}, treating as not deployed", certificate_id);
            Ok(Vec::new())
        }
        Err(e) => Err(e.into()),
    }
}

/// Compute what `certificate_id` still has to be deployed to for `spec`
pub async fn resolve(
    api: &dyn CdnCertificateApi,
    spec: &DomainSpec,
    certificate_id: &str,
) -> Result<Resolution, DeployError> {
    match spec {
        DomainSpec::Exact(domain) => {
            let deployed = deployed_instances(api, certificate_id).await?;
            if deployed.contains(domain) {
                info!("Certificate {} is already deployed to {}", certificate_id, domain);
                return Ok(Resolution::AlreadyDeployed);
            }
            Ok(Resolution::Deploy(TargetSet(vec![domain.clone()])))
        }
        DomainSpec::Wildcard(pattern) => {
            let response = api
                .describe_cert_domains(DescribeCertDomainsRequest {
                    cert_id: certificate_id.to_string(),
                })
                .await
                .context("DescribeCertDomains request failed")
                .map_err(DeployError::Resolve)?;
            let candidates = response.domains.unwrap_or_default();

            let deployed = deployed_instances(api, certificate_id).await?;
            let targets = TargetSet::subtract(candidates, &deployed);

            if targets.is_empty() {
                info!("No CDN instances left to deploy for {}", pattern);
                return Ok(Resolution::NothingToDeploy);
            }

            info!(
                "Resolved {} to {} CDN instance(s): {:?}",
                pattern,
                targets.len(),
                targets.as_slice()
            );
            Ok(Resolution::Deploy(targets))
        }
    }
}
