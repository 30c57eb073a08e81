//! Log formatting for built field groups.

use serde::Serialize;
use std::fmt::Debug;

/// Display adapter that prints built output as a YAML block, so a
/// `trace!` line shows the field group the way an editor would read it.
/// Values YAML cannot represent print with `{:#?}`.
pub struct Pretty<T>(pub T);

impl<T: Serialize + Debug> std::fmt::Display for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_yaml_ng::to_string(&self.0) {
            Ok(yaml) => write!(f, "\n{}", yaml),
            Err(_) => write!(f, "\n{:#?}", self.0),
        }
    }
}
