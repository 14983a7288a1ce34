//! Client side of the tool room backend: REST access, settings, and the
//! application store/controller the GUI and CLI front ends share.

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod status;
pub mod store;

pub use api::{ApiResult, HttpToolRoomClient, ToolRoomApi};
pub use config::{load_settings, ConfigOverrides, Settings};
pub use controller::{execute_mutation, fetch_resource, Controller, ControllerError};
pub use error::{ClientError, ConfigError};
pub use status::{status_label, status_tone, StatusTone};
pub use store::{
    Alert, AppState, FormError, FormKind, Loaded, MutationFailure, MutationKind, MutationOutput,
    MutationRequest, Resource, StoreError, StoreEvent, Tab,
};

#[cfg(test)]
#[path = "tests/fake_backend.rs"]
mod fake_backend;
