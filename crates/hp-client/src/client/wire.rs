//! JSON bodies that exist only on the wire.

use hp_core::PatchStatus;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct PatchStatusReply {
    pub status: PatchStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssetChangesReply {
    #[serde(default)]
    pub paths: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorReply {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}
