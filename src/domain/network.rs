//! Virtual network layout.

use std::net::Ipv4Addr;

use serde::Serialize;

use crate::domain::AppError;

/// Smallest subnet prefix the provider accepts.
pub const MAX_SUBNET_PREFIX: u8 = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubnetKind {
    Public,
    PrivateWithEgress,
}

impl SubnetKind {
    pub const ALL: [SubnetKind; 2] = [SubnetKind::Public, SubnetKind::PrivateWithEgress];

    fn label(self) -> &'static str {
        match self {
            SubnetKind::Public => "Public",
            SubnetKind::PrivateWithEgress => "Private",
        }
    }
}

/// A single subnet inside one availability zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubnetSpec {
    pub name: String,
    pub kind: SubnetKind,
    pub availability_zone_index: u8,
    pub cidr_block: String,
}

/// An IPv4 block in CIDR notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Block {
    base: u32,
    prefix: u8,
}

impl Ipv4Block {
    pub fn parse(cidr: &str) -> Result<Self, AppError> {
        let invalid = |reason: String| AppError::invalid_constant("network.cidr", reason);

        let (addr, prefix) =
            cidr.split_once('/').ok_or_else(|| invalid(format!("'{}' is missing a prefix", cidr)))?;
        let addr: Ipv4Addr =
            addr.parse().map_err(|_| invalid(format!("'{}' is not an IPv4 address", addr)))?;
        let prefix: u8 =
            prefix.parse().map_err(|_| invalid(format!("'{}' is not a prefix length", prefix)))?;
        if !(16..=MAX_SUBNET_PREFIX).contains(&prefix) {
            return Err(invalid(format!(
                "prefix /{} must be between /16 and /{}",
                prefix, MAX_SUBNET_PREFIX
            )));
        }

        let base = u32::from(addr);
        if base & !Self::mask(prefix) != 0 {
            return Err(invalid(format!("'{}' has host bits set", cidr)));
        }
        Ok(Self { base, prefix })
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    fn mask(prefix: u8) -> u32 {
        if prefix == 0 { 0 } else { u32::MAX << (32 - u32::from(prefix)) }
    }

    /// Split into `2^extra_bits` equal blocks and return the `index`-th one.
    fn nth_subdivision(&self, extra_bits: u8, index: u32) -> Ipv4Block {
        let prefix = self.prefix + extra_bits;
        let size = 1u32 << (32 - u32::from(prefix));
        Ipv4Block { base: self.base + index * size, prefix }
    }
}

impl std::fmt::Display for Ipv4Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", Ipv4Addr::from(self.base), self.prefix)
    }
}

/// Isolated virtual network hosting every network-scoped resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSpec {
    pub cidr_block: String,
    pub max_azs: u8,
    pub nat_gateways: u8,
    pub subnets: Vec<SubnetSpec>,
}

impl NetworkSpec {
    /// Lay out one public and one private subnet per zone with a NAT gateway each.
    pub fn new(cidr: &str, max_azs: u8) -> Result<Self, AppError> {
        let block = Ipv4Block::parse(cidr)?;
        let subnets = allocate_subnets(block, max_azs)?;
        Ok(Self { cidr_block: block.to_string(), max_azs, nat_gateways: max_azs, subnets })
    }

    pub fn subnets_of(&self, kind: SubnetKind) -> impl Iterator<Item = &SubnetSpec> {
        self.subnets.iter().filter(move |subnet| subnet.kind == kind)
    }
}

/// Carve equal power-of-two subnets out of `block`.
///
/// Allocation order is every public subnet by zone, then every private one.
pub fn allocate_subnets(block: Ipv4Block, azs: u8) -> Result<Vec<SubnetSpec>, AppError> {
    if azs == 0 {
        return Err(AppError::invalid_constant("network.max_azs", "must be at least 1"));
    }

    let count = u32::from(azs) * SubnetKind::ALL.len() as u32;
    let extra_bits = count.next_power_of_two().trailing_zeros() as u8;
    if block.prefix() + extra_bits > MAX_SUBNET_PREFIX {
        return Err(AppError::invalid_constant(
            "network.cidr",
            format!(
                "/{} is too small for {} subnets (would need /{})",
                block.prefix(),
                count,
                block.prefix() + extra_bits
            ),
        ));
    }

    let mut subnets = Vec::with_capacity(count as usize);
    let mut index = 0u32;
    for kind in SubnetKind::ALL {
        for az in 0..azs {
            subnets.push(SubnetSpec {
                name: format!("{}Subnet{}", kind.label(), az + 1),
                kind,
                availability_zone_index: az,
                cidr_block: block.nth_subdivision(extra_bits, index).to_string(),
            });
            index += 1;
        }
    }
    Ok(subnets)
}
