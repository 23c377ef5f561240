//! # IPv4 CIDR Ranges
//!
//! A range descriptor is a network address plus a prefix length
//! (`192.168.1.0/24`). Expansion maps an index to the nth address of the
//! block with plain integer arithmetic, so the walk is bounded by a count
//! and never by the address wrapping around. A `/0` block ends at
//! `255.255.255.255` instead of looping back to `0.0.0.0`.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use pnet::ipnetwork::Ipv4Network;

use crate::error::RangeError;

/// A validated IPv4 block. The stored address is always the network address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Cidr {
    network: Ipv4Addr,
    prefix: u8,
}

impl Ipv4Cidr {
    /// Builds a block from any address inside it, masking off the host bits.
    pub fn new(addr: Ipv4Addr, prefix: u8) -> Result<Self, RangeError> {
        let block = Ipv4Network::new(addr, prefix).map_err(|_| RangeError::InvalidPrefix {
            prefix: prefix.to_string(),
        })?;
        Ok(Self {
            network: block.network(),
            prefix: block.prefix(),
        })
    }

    pub fn network(&self) -> Ipv4Addr {
        self.network
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Number of addresses in the block, `2^(32 - prefix)`.
    pub fn len(&self) -> u64 {
        1u64 << (32 - u32::from(self.prefix))
    }

    /// A block always holds at least one address.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Last address of the block (the broadcast address for prefixes below 31).
    pub fn last(&self) -> Ipv4Addr {
        // len() >= 1, so the subtraction cannot underflow and the sum fits in u32.
        let offset = (self.len() - 1) as u32;
        Ipv4Addr::from(u32::from(self.network) + offset)
    }

    /// Returns the address at `index`, or `None` once `index` leaves the block.
    pub fn nth(&self, index: u64) -> Option<Ipv4Addr> {
        if index >= self.len() {
            return None;
        }
        Some(Ipv4Addr::from(u32::from(self.network) + index as u32))
    }

    /// Lazily walks every address of the block in ascending order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Ipv4Addr> + Clone {
        let block = *self;
        // A u32 index range is enough for every prefix except /0.
        // Walking the offset from the network address avoids the overflowing
        // `last + 1` end bound entirely.
        (0..=(block.len() - 1) as u32)
            .map(move |offset| Ipv4Addr::from(u32::from(block.network) + offset))
    }
}

impl FromStr for Ipv4Cidr {
    type Err = RangeError;

    /// Parses `address/prefix`. Surrounding whitespace is ignored; a bare
    /// address without a prefix is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (addr_str, prefix_str) = s.split_once('/').ok_or_else(|| RangeError::MissingPrefix {
            input: s.to_string(),
        })?;

        let addr: Ipv4Addr = addr_str.parse().map_err(|_| RangeError::InvalidAddress {
            addr: addr_str.to_string(),
        })?;

        let prefix: u8 = prefix_str.parse().map_err(|_| RangeError::InvalidPrefix {
            prefix: prefix_str.to_string(),
        })?;

        Self::new(addr, prefix)
    }
}

impl fmt::Display for Ipv4Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
