//! Certificate loading utilities for the quicrpc transport.
//!
//! This module provides functions to load X.509 certificates, private
//! keys, and trust pools from PEM files or in-memory PEM data, using
//! `rustls-pemfile`.

use crate::error::{CertificateError, Result};
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::RootCertStore;
use std::fs;
use std::path::Path;

/// Loads a certificate chain from a PEM file.
pub fn load_certificates_from_file(path: &Path) -> Result<Vec<CertificateDer<'static>>> {
    let pem_data = fs::read(path).map_err(|_| CertificateError::LoadFailed {
        path: path.to_path_buf(),
    })?;

    let certs = certificates_from_pem(&pem_data).map_err(|_| CertificateError::LoadFailed {
        path: path.to_path_buf(),
    })?;

    if certs.is_empty() {
        return Err(CertificateError::LoadFailed {
            path: path.to_path_buf(),
        }
        .into());
    }

    Ok(certs)
}

/// Loads a certificate chain from PEM-encoded bytes.
pub fn certificates_from_pem(pem_data: &[u8]) -> Result<Vec<CertificateDer<'static>>> {
    let mut reader = std::io::Cursor::new(pem_data);
    rustls_pemfile::certs(&mut reader)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| CertificateError::UnsupportedFormat.into())
}

/// Loads a private key from a PEM file.
pub fn load_private_key_from_file(path: &Path) -> Result<PrivateKeyDer<'static>> {
    let pem_data = fs::read(path).map_err(|_| CertificateError::PrivateKeyLoadFailed {
        path: path.to_path_buf(),
    })?;

    private_key_from_pem(&pem_data).map_err(|_| {
        CertificateError::PrivateKeyLoadFailed {
            path: path.to_path_buf(),
        }
        .into()
    })
}

/// Loads a private key from PEM-encoded bytes.
pub fn private_key_from_pem(pem_data: &[u8]) -> Result<PrivateKeyDer<'static>> {
    let mut reader = std::io::Cursor::new(pem_data);
    rustls_pemfile::private_key(&mut reader)
        .map_err(|_| CertificateError::UnsupportedFormat)?
        .ok_or_else(|| CertificateError::MissingPrivateKey.into())
}

/// Builds a trust pool from a PEM bundle on disk.
pub fn load_root_store_from_file(path: &Path) -> Result<RootCertStore> {
    let pem_data = fs::read(path).map_err(|_| CertificateError::LoadFailed {
        path: path.to_path_buf(),
    })?;

    root_store_from_pem(&pem_data)
}

/// Builds a trust pool from a PEM bundle in memory.
///
/// Fails if no certificate in the bundle could be added to the pool.
pub fn root_store_from_pem(pem_data: &[u8]) -> Result<RootCertStore> {
    let certs = certificates_from_pem(pem_data)?;

    let mut roots = RootCertStore::empty();
    let mut added = 0;
    for cert in certs {
        if roots.add(cert).is_ok() {
            added += 1;
        }
    }

    if added == 0 {
        return Err(CertificateError::EmptyPool.into());
    }

    Ok(roots)
}
