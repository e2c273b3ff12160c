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

use std::{any::Any, error::Error as StdError, sync::Arc};

use serde::Serialize;
use strum::EnumProperty;

/// Coarse classification shared by every castplay error.
///
/// The `exit_code` property follows the BSD `sysexits.h` convention so the
/// binary can map a failure straight to a process status.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    Serialize,
    strum_macros::EnumProperty,
    strum_macros::EnumString,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StatusCode {
    #[strum(props(exit_code = "64"))]
    InvalidArgument,
    #[strum(props(exit_code = "65"))]
    Unsupported,
    #[strum(props(exit_code = "66"))]
    NotFound,
    #[strum(props(exit_code = "78"))]
    Config,
    #[strum(props(exit_code = "70"))]
    Internal,
    #[strum(props(exit_code = "1"))]
    Unknown,
}

impl StatusCode {
    pub fn exit_code(self) -> i32 {
        self.get_str("exit_code")
            .and_then(|value| value.parse::<i32>().ok())
            .unwrap_or(1)
    }

    /// Whether the failure only rejects one input and leaves the caller's
    /// state usable.
    pub const fn is_recoverable(self) -> bool {
        matches!(
            self,
            Self::InvalidArgument | Self::Unsupported | Self::NotFound
        )
    }
}

pub trait StackError: StdError {
    fn debug_fmt(&self, layer: usize, buf: &mut Vec<String>);

    fn next(&self) -> Option<&dyn StackError>;

    fn last(&self) -> &dyn StackError
    where
        Self: Sized,
    {
        let Some(mut result) = self.next() else {
            return self;
        };
        while let Some(err) = result.next() {
            result = err;
        }
        result
    }

    fn transparent(&self) -> bool { false }
}

pub trait ErrorExt: StackError {
    fn status_code(&self) -> StatusCode { StatusCode::Unknown }

    fn as_any(&self) -> &dyn Any;

    fn output_msg(&self) -> String
    where
        Self: Sized,
    {
        match self.status_code() {
            StatusCode::Unknown | StatusCode::Internal => {
                format!("Internal error: {}", self.status_code().exit_code())
            }
            _ => {
                let error = self.last();
                if let Some(external_error) = error.source() {
                    let mut root = external_error;
                    while let Some(source) = root.source() {
                        root = source;
                    }
                    if error.transparent() {
                        format!("{root}")
                    } else {
                        format!("{error}: {root}")
                    }
                } else {
                    format!("{error}")
                }
            }
        }
    }

    fn root_cause(&self) -> Option<&dyn StdError>
    where
        Self: Sized,
    {
        let error = self.last();
        let mut source = error.source()?;
        while let Some(next) = source.source() {
            source = next;
        }
        Some(source)
    }
}

impl<T: ?Sized + StackError> StackError for Arc<T> {
    fn debug_fmt(&self, layer: usize, buf: &mut Vec<String>) { self.as_ref().debug_fmt(layer, buf) }

    fn next(&self) -> Option<&dyn StackError> { self.as_ref().next() }
}

impl<T: StackError> StackError for Box<T> {
    fn debug_fmt(&self, layer: usize, buf: &mut Vec<String>) { self.as_ref().debug_fmt(layer, buf) }

    fn next(&self) -> Option<&dyn StackError> { self.as_ref().next() }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn exit_codes_follow_sysexits() {
        assert_eq!(StatusCode::InvalidArgument.exit_code(), 64);
        assert_eq!(StatusCode::Unsupported.exit_code(), 65);
        assert_eq!(StatusCode::NotFound.exit_code(), 66);
        assert_eq!(StatusCode::Config.exit_code(), 78);
        assert_eq!(StatusCode::Internal.exit_code(), 70);
        assert_eq!(StatusCode::Unknown.exit_code(), 1);
    }

    #[test]
    fn status_code_round_trips_through_its_name() {
        assert_eq!(StatusCode::InvalidArgument.to_string(), "invalid_argument");
        assert_eq!(
            StatusCode::from_str("not_found").unwrap(),
            StatusCode::NotFound
        );
    }

    #[test]
    fn only_input_errors_are_recoverable() {
        assert!(StatusCode::Unsupported.is_recoverable());
        assert!(!StatusCode::Config.is_recoverable());
        assert!(!StatusCode::Internal.is_recoverable());
    }
}
