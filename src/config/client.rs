//! Client-side endpoint configuration and dial options.

use super::defaults::*;
use crate::error::{ConfigError, Result};
use crate::rpc::ChannelOption;
use crate::tls::TlsConfig;
use std::time::Duration;

/// Options accepted by [`crate::endpoint::dial`].
#[derive(Debug)]
pub enum DialOption {
    /// Sets the security configuration used for the session handshake and,
    /// on generic connections, the classic TLS handshake.
    TlsConfig(TlsConfig),
    /// Enables or disables session keep-alive probing.
    KeepAlive(bool),
    /// Bounds session establishment per dial attempt.
    ConnectTimeout(Duration),
    /// Passes an RPC-framework option through to the client handle.
    Rpc(ChannelOption),
}

/// Immutable client endpoint configuration, built once per Dial call.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub tls: TlsConfig,
    pub keep_alive: bool,
    pub connect_timeout: Duration,
    pub rpc_options: Vec<ChannelOption>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            tls: TlsConfig::default(),
            keep_alive: default_keep_alive(),
            connect_timeout: default_connect_timeout(),
            rpc_options: Vec::new(),
        }
    }
}

impl ClientConfig {
    /// Applies `options` on top of the defaults.
    ///
    /// Returns an error without producing a configuration if any option
    /// fails validation.
    pub fn apply(options: impl IntoIterator<Item = DialOption>) -> Result<Self> {
        let mut config = Self::default();
        for option in options {
            match option {
                DialOption::TlsConfig(tls) => config.tls = tls,
                DialOption::KeepAlive(enabled) => config.keep_alive = enabled,
                DialOption::ConnectTimeout(timeout) => {
                    if timeout.is_zero() {
                        return Err(ConfigError::InvalidValue {
                            option: "connect_timeout".to_string(),
                            reason: "must be greater than zero".to_string(),
                        }
                        .into());
                    }
                    config.connect_timeout = timeout;
                }
                DialOption::Rpc(option) => config.rpc_options.push(option),
            }
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.tls.insecure_skip_verify && self.tls.roots.is_some() {
            return Err(ConfigError::Conflict {
                conflict: "insecure_skip_verify and a trust pool are mutually exclusive"
                    .to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustls::RootCertStore;

    #[test]
    fn apply_defaults() {
        let config = ClientConfig::apply([]).unwrap();
        assert!(config.keep_alive);
        assert_eq!(config.connect_timeout, default_connect_timeout());
        assert!(!config.tls.insecure_skip_verify);
    }

    #[test]
    fn apply_overrides() {
        let config = ClientConfig::apply([
            DialOption::KeepAlive(false),
            DialOption::ConnectTimeout(Duration::from_millis(50)),
        ])
        .unwrap();
        assert!(!config.keep_alive);
        assert_eq!(config.connect_timeout, Duration::from_millis(50));
    }

    #[test]
    fn zero_timeout_rejected() {
        let result = ClientConfig::apply([DialOption::ConnectTimeout(Duration::ZERO)]);
        assert!(result.is_err());
    }

    #[test]
    fn conflicting_tls_rejected() {
        let tls = TlsConfig {
            roots: Some(RootCertStore::empty()),
            insecure_skip_verify: true,
            ..TlsConfig::default()
        };
        let result = ClientConfig::apply([DialOption::TlsConfig(tls)]);
        assert!(result.is_err());
    }
}
