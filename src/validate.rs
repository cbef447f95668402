//! Closed enumerations for the export option fields, with the synonym
//! folding Ganesha accepts, plus the scalar checks `Export::validate` uses.

use crate::error::ValidationError;
use std::fmt;
use std::str::FromStr;

/// Answers whether a CephFS filesystem with the given name exists.
///
/// Supplied by the caller; this crate never looks at a cluster itself.
pub trait FsChecker {
    fn fs_exists(&self, fs_name: &str) -> bool;
}

impl<F> FsChecker for F
where
    F: Fn(&str) -> bool,
{
    fn fs_exists(&self, fs_name: &str) -> bool {
        self(fs_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessType {
    Rw,
    Ro,
    None,
}

const VALID_ACCESS_TYPES: [&str; 3] = ["rw", "ro", "none"];

impl AccessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessType::Rw => "RW",
            AccessType::Ro => "RO",
            AccessType::None => "None",
        }
    }
}

impl FromStr for AccessType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rw" => Ok(AccessType::Rw),
            "ro" => Ok(AccessType::Ro),
            "none" => Ok(AccessType::None),
            _ => Err(ValidationError::invalid(format!(
                "{s} is invalid, valid access type are {VALID_ACCESS_TYPES:?}"
            ))),
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Squash {
    RootSquash,
    RootIdSquash,
    AllSquash,
    NoRootSquash,
}

const VALID_SQUASH: [&str; 15] = [
    "root",
    "root_squash",
    "rootsquash",
    "rootid",
    "root_id_squash",
    "rootidsquash",
    "all",
    "all_squash",
    "allsquash",
    "all_anonymous",
    "all_anomnymous",
    "allanonymous",
    "no_root_squash",
    "none",
    "noidsquash",
];

impl Squash {
    pub fn as_str(&self) -> &'static str {
        match self {
            Squash::RootSquash => "root_squash",
            Squash::RootIdSquash => "root_id_squash",
            Squash::AllSquash => "all_squash",
            Squash::NoRootSquash => "no_root_squash",
        }
    }
}

impl FromStr for Squash {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "root" | "root_squash" | "rootsquash" => Ok(Squash::RootSquash),
            "rootid" | "root_id_squash" | "rootidsquash" => Ok(Squash::RootIdSquash),
            // all_anomnymous is a misspelling older tooling accepted
            "all" | "all_squash" | "allsquash" | "all_anonymous" | "all_anomnymous"
            | "allanonymous" => Ok(Squash::AllSquash),
            "no_root_squash" | "none" | "noidsquash" => Ok(Squash::NoRootSquash),
            _ => Err(ValidationError::invalid(format!(
                "squash {s} not in valid list {VALID_SQUASH:?}"
            ))),
        }
    }
}

impl fmt::Display for Squash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecType {
    None,
    Sys,
    Krb5,
    Krb5i,
    Krb5p,
}

const VALID_SEC_TYPES: [&str; 5] = ["none", "sys", "krb5", "krb5i", "krb5p"];

impl SecType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecType::None => "none",
            SecType::Sys => "sys",
            SecType::Krb5 => "krb5",
            SecType::Krb5i => "krb5i",
            SecType::Krb5p => "krb5p",
        }
    }
}

impl FromStr for SecType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(SecType::None),
            "sys" => Ok(SecType::Sys),
            "krb5" => Ok(SecType::Krb5),
            "krb5i" => Ok(SecType::Krb5i),
            "krb5p" => Ok(SecType::Krb5p),
            _ => Err(ValidationError::invalid(format!(
                "SecType {s} invalid, valid types are {VALID_SEC_TYPES:?}"
            ))),
        }
    }
}

impl fmt::Display for SecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The pseudo path must be absolute and cannot be the pseudo root itself.
pub fn validate_pseudo(pseudo: &str) -> Result<(), ValidationError> {
    if !pseudo.starts_with('/') || pseudo == "/" {
        return Err(ValidationError::invalid(format!(
            "pseudo path {pseudo} is invalid. It should be an absolute path and it cannot be just '/'."
        )));
    }
    Ok(())
}

pub fn validate_protocols(protocols: &[i64]) -> Result<(), ValidationError> {
    match protocols.iter().find(|p| !matches!(**p, 3 | 4)) {
        Some(p) => Err(ValidationError::invalid(format!("Invalid protocol {p}"))),
        None => Ok(()),
    }
}

pub fn validate_transports<S: AsRef<str>>(transports: &[S]) -> Result<(), ValidationError> {
    for transport in transports {
        let transport = transport.as_ref();
        if !matches!(transport.to_uppercase().as_str(), "TCP" | "UDP") {
            return Err(ValidationError::invalid(format!(
                "{transport} is not a valid transport protocol"
            )));
        }
    }
    Ok(())
}
