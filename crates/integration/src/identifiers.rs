//! Newtype file names.
//!
//! The compiler binary and its companion runtime library are located by exact,
//! case-sensitive file name. Wrapping the names in distinct newtypes prevents
//! passing one where the other is expected, and guarantees neither is empty.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for String-wrapped file-name newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! file_name {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(pub(crate) String);

        impl $name {
            /// Creates a new name, returning `None` if the value is empty or
            /// contains a path separator.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() || v.contains(|c: char| c == '/' || c == '\\') {
                    None
                } else {
                    Some(Self(v))
                }
            }

            /// Returns the name as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value.clone()).ok_or_else(|| format!("invalid file name '{value}'"))
            }
        }

        impl From<$name> for String {
            fn from(name: $name) -> String {
                name.0
            }
        }
    };
}

file_name! {
    /// File name of the story compiler executable (e.g. `inklecate_win.exe`).
    ExecutableName
}

file_name! {
    /// Final file name of the compiler's companion runtime library
    /// (e.g. `ink-engine-runtime.dll`).
    CompanionName
}

impl CompanionName {
    /// Returns the pending file name: the final name with `pending_suffix`
    /// appended (e.g. `ink-engine-runtime.dll.temp`).
    pub fn pending_name(&self, pending_suffix: &str) -> String {
        format!("{}{}", self.0, pending_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_names_are_rejected() {
        assert!(ExecutableName::new("").is_none());
        assert!(CompanionName::new("").is_none());
    }

    #[test]
    fn names_with_separators_are_rejected() {
        assert!(ExecutableName::new("bin/inklecate").is_none());
        assert!(ExecutableName::new("bin\\inklecate.exe").is_none());
    }

    #[test]
    fn pending_name_appends_suffix() {
        let companion = CompanionName::new("runtime.dll").unwrap();
        assert_eq!(companion.pending_name(".temp"), "runtime.dll.temp");
    }
}
