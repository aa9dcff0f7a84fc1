#![allow(clippy::uninlined_format_args)]

//! Error related data structures to be shared and used.
//!
//! This module contains the [`Error`] enum, which is used to represent
//! errors that can occur within the dotmatrix domain.

use std::fmt::{self, Display, Formatter};

/// Top level enum for error handling within dotmatrix.
///
/// Fatal conditions (illegal opcodes, malformed ROM images) are
/// represented here and bubble up to the host through `Result` values,
/// guest-program conditions are never mapped to an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The CPU fetched one of the eleven undefined primary opcodes,
    /// carries both the opcode and the PC at which it was fetched.
    IllegalOpcode(u8, u16),

    /// The ROM image is smaller than a complete cartridge header or
    /// smaller than the size its header declares.
    RomTooShort,

    /// The cartridge type byte selects an MBC that is not provided,
    /// carries the raw type byte from the header.
    UnsupportedMbc(u8),

    /// A raw I/O file access was made outside the I/O register range,
    /// should be unreachable under correct address decoding.
    BusOutOfRange(u16),

    InvalidParameter(String),
    CustomError(String),
}

impl Error {
    pub fn description(&self) -> String {
        match self {
            Error::IllegalOpcode(opcode, pc) => {
                format!("Illegal opcode 0x{:02x} at 0x{:04x}", opcode, pc)
            }
            Error::RomTooShort => String::from("Invalid ROM size"),
            Error::UnsupportedMbc(value) => format!("Unsupported MBC type 0x{:02x}", value),
            Error::BusOutOfRange(addr) => format!("Bus access out of range 0x{:04x}", addr),
            Error::InvalidParameter(message) => format!("Invalid parameter: {}", message),
            Error::CustomError(message) => String::from(message),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}
