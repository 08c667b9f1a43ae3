use axum_server::tls_rustls::RustlsConfig;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::ServerConfig;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use tower_auth_models::AuthError;
use tracing::info;

/// Selects aws-lc-rs as the process-wide rustls provider. Safe to call twice.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
}

fn tls_error(path: &Path, reason: impl std::fmt::Display) -> AuthError {
    AuthError::TlsError { reason: format!("{}: {}", path.display(), reason) }
}

fn read_certificates(path: &Path) -> Result<Vec<CertificateDer<'static>>, AuthError> {
    let mut reader = BufReader::new(File::open(path).map_err(|e| tls_error(path, e))?);
    let certs = rustls_pemfile::certs(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| tls_error(path, e))?;

    if certs.is_empty() {
        return Err(tls_error(path, "no PEM certificates found"));
    }
    Ok(certs)
}

fn read_private_key(path: &Path) -> Result<PrivateKeyDer<'static>, AuthError> {
    let mut reader = BufReader::new(File::open(path).map_err(|e| tls_error(path, e))?);
    rustls_pemfile::private_key(&mut reader)
        .map_err(|e| tls_error(path, e))?
        .ok_or_else(|| tls_error(path, "no PEM private key found"))
}

/// Builds the server TLS config from PEM files mounted at `cert_path` and `key_path`.
pub fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig, AuthError> {
    install_crypto_provider();

    let certs = read_certificates(cert_path)?;
    let key = read_private_key(key_path)?;

    let mut config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(|e| tls_error(key_path, e))?;
    config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

    info!(cert = %cert_path.display(), "TLS certificate loaded");
    Ok(RustlsConfig::from_config(Arc::new(config)))
}
