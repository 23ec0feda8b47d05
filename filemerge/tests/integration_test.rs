#[path = "integration/common/mod.rs"]
mod common;

#[path = "integration/merge_modes.rs"]
mod merge_modes;

#[path = "integration/remote_inputs.rs"]
mod remote_inputs;

#[path = "integration/error_cases.rs"]
mod error_cases;
