//! Identifier newtypes shared across the workspace.

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            /// Create a new identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id! {
    /// Unique identifier for a server-side program.
    ProgramId
}

string_id! {
    /// Unique identifier for a job.
    JobId
}

string_id! {
    /// Identifier grouping dependent jobs on the server.
    ///
    /// Assigned by the backend on the first submission of a session; equal to
    /// that first job's id.
    SessionId
}

impl From<JobId> for SessionId {
    fn from(id: JobId) -> Self {
        Self(id.0)
    }
}
