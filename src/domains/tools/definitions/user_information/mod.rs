//! Personal information namespace.
//!
//! The profile lives in a JSON file (`MCP_USER_DATA_PATH`). A missing or
//! incomplete profile is a configuration problem, not a soft failure: the
//! caller has to run `tools --setup-profile` first.

mod identity;
mod profile;
mod setup;

pub use identity::{Identity, SystemIdentity, gecos_from_passwd};
pub use profile::{REQUIRED_FIELDS, age_on, missing_fields, personal_data, personal_data_with};
pub use setup::{DialoguerPrompter, Prompter, SetupOutcome, ensure_profile};

use crate::domains::tools::NamespaceDef;
use crate::operation;

pub const DESCRIPTION: &str = "Current user's personal information utilities.";

pub fn namespace() -> NamespaceDef {
    NamespaceDef::from_module(module_path!(), DESCRIPTION).operation(operation!(
        "personal_data",
        "Current user's name, full name, birthday, age, email, phone and addresses.",
        |_, config| personal_data(config)
    ))
}
