//! Solana cluster selection for deep links.
//!
//! Phantom only needs the cluster's network string. Anything we don't
//! recognize falls back to mainnet: callers routinely hand us a
//! half-initialized value, and pointing the wallet at mainnet is what
//! Phantom would do without the parameter anyway.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A Solana cluster as understood by Phantom's `cluster` parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Cluster {
    #[default]
    MainNet,
    DevNet,
    TestNet,
}

impl Cluster {
    /// The network identifier Phantom expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            Cluster::MainNet => "mainnet-beta",
            Cluster::DevNet => "devnet",
            Cluster::TestNet => "testnet",
        }
    }

    /// Parse a cluster name. Accepts the Phantom strings as well as the
    /// short name `mainnet`, case-insensitive. `None` if unrecognized.
    pub fn parse_known(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mainnet-beta" | "mainnet" => Some(Cluster::MainNet),
            "devnet" => Some(Cluster::DevNet),
            "testnet" => Some(Cluster::TestNet),
            _ => None,
        }
    }

    /// Like [`Cluster::parse_known`], but returns `MainNet` for any
    /// unrecognized value.
    pub fn from_str_lossy(s: &str) -> Self {
        Self::parse_known(s).unwrap_or_default()
    }
}

impl FromStr for Cluster {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_str_lossy(s))
    }
}

impl From<String> for Cluster {
    fn from(s: String) -> Self {
        Self::from_str_lossy(&s)
    }
}

impl From<Cluster> for String {
    fn from(cluster: Cluster) -> Self {
        cluster.as_str().to_string()
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
