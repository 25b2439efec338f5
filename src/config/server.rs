//! Server-side endpoint configuration and listen options.

use super::defaults::*;
use crate::error::Result;
use crate::rpc::ServeOption;
use crate::tls::TlsConfig;

/// Options accepted by [`crate::endpoint::listen`].
#[derive(Debug)]
pub enum ServerOption {
    /// Sets the security configuration used for session acceptance and,
    /// on generic connections, the classic TLS handshake.
    TlsConfig(TlsConfig),
    /// Enables or disables session keep-alive probing.
    KeepAlive(bool),
    /// Passes an RPC-framework option through to the server handle.
    Rpc(ServeOption),
}

/// Immutable server endpoint configuration, built once per Listen call.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub tls: TlsConfig,
    pub keep_alive: bool,
    pub rpc_options: Vec<ServeOption>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            tls: TlsConfig::default(),
            keep_alive: default_keep_alive(),
            rpc_options: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Applies `options` on top of the defaults.
    ///
    /// The certificate material itself is validated later by the eager
    /// server-crypto build in Listen, before any socket is bound.
    pub fn apply(options: impl IntoIterator<Item = ServerOption>) -> Result<Self> {
        let mut config = Self::default();
        for option in options {
            match option {
                ServerOption::TlsConfig(tls) => config.tls = tls,
                ServerOption::KeepAlive(enabled) => config.keep_alive = enabled,
                ServerOption::Rpc(option) => config.rpc_options.push(option),
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_defaults() {
        let config = ServerConfig::apply([]).unwrap();
        assert!(config.keep_alive);
        assert!(config.tls.certificates.is_empty());
    }

    #[test]
    fn apply_keep_alive_off() {
        let config = ServerConfig::apply([ServerOption::KeepAlive(false)]).unwrap();
        assert!(!config.keep_alive);
    }
}
