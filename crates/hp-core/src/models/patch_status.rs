use crate::{CoreError, CoreResult};

use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// What the compile server is currently doing. Polled, never invented locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchStatus {
    #[default]
    None,
    Compiling,
    Patching,
    Succeeded,
}

impl PatchStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::None => "none",
            Self::Compiling => "compiling",
            Self::Patching => "patching",
            Self::Succeeded => "succeeded",
        }
    }
}

impl FromStr for PatchStatus {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "none" => Ok(Self::None),
            "compiling" => Ok(Self::Compiling),
            "patching" => Ok(Self::Patching),
            "succeeded" => Ok(Self::Succeeded),
            _ => Err(CoreError::InvalidPatchStatus {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
