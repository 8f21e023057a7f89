#![allow(unused_imports)]

pub use bootdag_test_utils::builders::{diamond, RegistryBuilder};
pub use bootdag_test_utils::recording::RecordingSink;
pub use bootdag_test_utils::scripted::{Probe, Script, ScriptedInitializer};
pub use bootdag_test_utils::{init_tracing, with_timeout};
