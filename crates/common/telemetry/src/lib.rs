// Copyright 2025 Crrow
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Telemetry
//!
//! Logging and panic reporting for castplay.
//!
//! - **[`logging`]**: stdout and rolling-file `tracing` layers with text or
//!   JSON formatting, and a level filter that can be swapped at runtime
//! - **[`panic_hook`]**: panics reported as structured `tracing` events with
//!   a captured backtrace
//!
//! ```no_run
//! use castplay_common_telemetry::{LoggingOptions, init_global_logging, reload_level};
//!
//! let opts = LoggingOptions::builder().level("info").append_stdout(true).build();
//! let _guards = init_global_logging("castplay", &opts).expect("logging");
//! castplay_common_telemetry::panic_hook::set_panic_hook();
//! reload_level("info,castplay_player=debug").expect("valid level");
//! ```

pub mod logging;
pub mod panic_hook;

pub use logging::{
    LogFormat, LoggingOptions, init_default_ut_logging, init_global_logging, parse_targets,
    reload_level,
};
