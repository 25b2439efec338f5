//! Default values for endpoint configuration.

use std::time::Duration;

pub fn default_keep_alive() -> bool {
    true
}

pub fn default_keep_alive_interval() -> Duration {
    Duration::from_secs(15)
}

pub fn default_idle_timeout() -> Duration {
    Duration::from_secs(30)
}

pub fn default_connect_timeout() -> Duration {
    Duration::from_secs(10)
}
