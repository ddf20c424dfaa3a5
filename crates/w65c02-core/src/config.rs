//! Host-side configuration for building and starting a machine.

use crate::peripherals::ConsoleConfig;

/// Where execution starts after the image is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EntryPoint {
    /// Apply the reset sequence and start at the reset vector.
    #[default]
    ResetVector,
    /// Apply the reset sequence, then override `pc`.
    Address(u16),
}

/// Machine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CoreConfig {
    /// Address the first image byte is loaded at.
    pub load_address: u16,
    /// Start address policy.
    pub entry: EntryPoint,
    /// Console port assignment.
    pub console: ConsoleConfig,
}

impl CoreConfig {
    /// Resolves the initial `pc` for a freshly reset machine.
    #[must_use]
    pub const fn entry_pc(&self, reset_vector_target: u16) -> u16 {
        match self.entry {
            EntryPoint::ResetVector => reset_vector_target,
            EntryPoint::Address(addr) => addr,
        }
    }
}
