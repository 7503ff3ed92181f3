use std::fmt;

/// One-shot message for the user, the equivalent of a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A finished capture was saved into the library.
    Saved {
        /// File name the capture was saved under.
        file_name: String,
    },
    /// A recording was renamed.
    Renamed {
        /// New file name including extension.
        file_name: String,
    },
    /// A rename was refused because the name is taken.
    RenameRejected {
        /// File name that already exists.
        file_name: String,
    },
    /// Selected recordings were deleted.
    Deleted {
        /// How many files were actually removed.
        count: usize,
    },
    /// A command failed; the state was left as it was.
    Failed {
        /// Human-readable reason.
        message: String,
    },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Saved { file_name } => write!(f, "Recorded \"{file_name}\""),
            Notice::Renamed { file_name } => write!(f, "Saved as \"{file_name}\""),
            Notice::RenameRejected { file_name } => {
                write!(f, "\"{file_name}\" already exists")
            }
            Notice::Deleted { count: 1 } => f.write_str("Deleted 1 recording"),
            Notice::Deleted { count } => write!(f, "Deleted {count} recordings"),
            Notice::Failed { message } => write!(f, "Error: {message}"),
        }
    }
}
