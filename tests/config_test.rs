use certdeploy::config::{load_config, validate_config, Config};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn fixture_path(filename: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(filename);
    path.to_str().unwrap().to_string()
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn sample_config() -> String {
    format!(
        r#"
[access]
name = "tencent-prod"
id = "rec123"
credential = '{{"secretId":"AKID","secretKey":"secret"}}'

[deploy]
domain = "example.com"
certificate_path = "{}"
private_key_path = "{}"

[deploy.config]
domain = "*.example.com"
"#,
        fixture_path("example.com.crt"),
        fixture_path("ec_p256.key")
    )
}

fn parse(contents: &str) -> Config {
    toml::from_str(contents).unwrap()
}

#[test]
fn test_load_config_with_defaults() {
    let file = write_config(&sample_config());
    let config = load_config(file.path().to_str().unwrap()).unwrap();

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.output, "console");
    assert_eq!(config.provider.ssl_endpoint, "ssl.tencentcloudapi.com");
    assert_eq!(config.provider.cdn_endpoint, "cdn.tencentcloudapi.com");
    assert_eq!(config.provider.timeout_secs, 30);
    assert_eq!(config.provider.scheme, "https");
    assert_eq!(config.provider.region, None);
    assert_eq!(config.deploy.previous_certificate_path, None);
    assert!(validate_config(&config).is_ok());
}

#[test]
fn test_load_config_missing_file() {
    let err = load_config("/nonexistent/config.toml").unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn test_load_config_missing_access() {
    let file = write_config("[deploy]\ndomain = \"example.com\"\n");
    assert!(load_config(file.path().to_str().unwrap()).is_err());
}

#[test]
fn test_deployer_option_from_config() {
    let config = parse(&sample_config());
    let option = config.deployer_option().unwrap();

    assert_eq!(option.access_record.name, "tencent-prod");
    assert_eq!(option.access_record.id, "rec123");
    assert_eq!(option.domain, "example.com");
    assert_eq!(option.get_deploy_string("domain"), "*.example.com");
    assert!(option.certificate.certificate.contains("BEGIN CERTIFICATE"));
    assert!(option.certificate.private_key.contains("BEGIN EC PRIVATE KEY"));
}

#[test]
fn test_deployer_option_missing_certificate() {
    let mut config = parse(&sample_config());
    config.deploy.certificate_path = "/nonexistent/cert.crt".to_string();

    let err = config.deployer_option().unwrap_err();
    assert!(err.to_string().contains("Failed to read certificate file"));
}

#[test]
fn test_validate_config_requires_cdn_domain() {
    let mut config = parse(&sample_config());
    config.deploy.config.clear();
    assert!(validate_config(&config).is_err());
}

#[test]
fn test_validate_config_invalid_provider() {
    let mut config = parse(&sample_config());
    config.provider.timeout_secs = 0;
    assert!(validate_config(&config).is_err());

    let mut config = parse(&sample_config());
    config.provider.scheme = "ftp".to_string();
    assert!(validate_config(&config).is_err());
}

#[test]
fn test_validate_config_empty_access_record() {
    let mut config = parse(&sample_config());
    config.access.name = " ".to_string();
    assert!(validate_config(&config).is_err());
}
