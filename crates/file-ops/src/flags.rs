//! Open-mode flags.

/// How a file is opened by a [`HandleProvider`](crate::HandleProvider).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenFlags {
    pub read: bool,
    pub write: bool,
    pub create: bool,
    pub truncate: bool,
    /// Fail if the file already exists (create-new).
    pub exclusive: bool,
    /// Every write lands at the end of the file.
    pub append: bool,
    /// Permission bits for a newly created file (Unix only).
    pub mode: Option<u32>,
}

impl OpenFlags {
    /// Opens an existing file for reading.
    pub fn read_only() -> Self {
        Self {
            read: true,
            ..Default::default()
        }
    }

    /// Opens a file for writing, creating it if needed.
    ///
    /// The file is truncated unless `append` is set. `exclusive` makes the
    /// open fail when the file already exists.
    pub fn for_write(exclusive: bool, append: bool, mode: Option<u32>) -> Self {
        Self {
            read: false,
            write: true,
            create: true,
            truncate: !append,
            exclusive,
            append,
            mode,
        }
    }

    /// Converts the flags into tokio open options.
    pub fn to_open_options(&self) -> tokio::fs::OpenOptions {
        let mut opts = tokio::fs::OpenOptions::new();
        opts.read(self.read);

        // `append` implies write access; `truncate` and `append` are exclusive.
        if self.append {
            opts.append(true);
        } else {
            opts.write(self.write).truncate(self.truncate);
        }

        if self.exclusive {
            opts.create_new(true);
        } else {
            opts.create(self.create);
        }

        #[cfg(unix)]
        {
            if self.create || self.exclusive {
                opts.mode(self.mode.unwrap_or(crate::DEFAULT_FILE_MODE));
            }
        }

        opts
    }
}
