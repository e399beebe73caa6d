use std::str::FromStr;

use ipnet::IpNet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("'{}' is not a valid network/prefix CIDR!", .0)]
pub struct InvalidCidr(pub String);

/// Parses a CIDR and truncates it to its base network address,
/// so `10.0.0.5/24` and `10.0.0.0/24` compare equal.
pub fn canonical_cidr(value: &str) -> Result<IpNet, InvalidCidr> {
    IpNet::from_str(value.trim())
        .map(|net| net.trunc())
        .map_err(|_| InvalidCidr(value.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_cidr_truncates_host_bits() {
        assert_eq!(
            canonical_cidr("10.0.0.5/24").unwrap().to_string(),
            "10.0.0.0/24"
        );
        assert_eq!(
            canonical_cidr(" 192.168.12.0/22 ").unwrap().to_string(),
            "192.168.12.0/22"
        );
        assert_eq!(
            canonical_cidr("fd00::17/64").unwrap().to_string(),
            "fd00::/64"
        );
    }

    #[test]
    fn canonical_cidr_rejects_garbage() {
        assert_eq!(
            canonical_cidr("10.0.0.0"),
            Err(InvalidCidr("10.0.0.0".to_owned()))
        );
        assert!(canonical_cidr("10.0.0.0/33").is_err());
        assert!(canonical_cidr("node1").is_err());
    }
}
