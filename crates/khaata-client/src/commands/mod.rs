pub mod customers;
pub mod details;
pub mod transactions;

use std::path::Path;

use crate::ClientResult;
use crate::setup::{SetupContext, ensure_initialized, ensure_initialized_at};

pub(crate) fn load_setup(home_override: Option<&Path>) -> ClientResult<SetupContext> {
    match home_override {
        Some(home) => ensure_initialized_at(home),
        None => ensure_initialized(),
    }
}
