use std::path::PathBuf;

/// Path token replaced by the service name.
pub const PROJECT_TOKEN: &str = "template";

/// Path token replaced by the organization name.
pub const ORGANIZATION_TOKEN: &str = "organization";

/// Marker for user-customizable files that survive regeneration.
pub const HOOK_MARKER: &str = "hook";

/// Values substituted for the path tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTokens {
    pub project: String,
    pub organization: String,
}

impl PathTokens {
    pub fn new(project: impl Into<String>, organization: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            organization: organization.into(),
        }
    }

    /// Replace whole directory segments equal to a token.
    pub fn substitute_directory(&self, directory: &str) -> String {
        directory
            .split('/')
            .map(|segment| match segment {
                PROJECT_TOKEN => self.project.as_str(),
                ORGANIZATION_TOKEN => self.organization.as_str(),
                other => other,
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Replace a token at the start of a file name.
    pub fn substitute_file_name(&self, file_name: &str) -> String {
        if let Some(rest) = file_name.strip_prefix(PROJECT_TOKEN) {
            format!("{}{rest}", self.project)
        } else if let Some(rest) = file_name.strip_prefix(ORGANIZATION_TOKEN) {
            format!("{}{rest}", self.organization)
        } else {
            file_name.to_string()
        }
    }
}

/// File permission class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permissions {
    #[default]
    ReadWrite,
    Executable,
}

impl Permissions {
    pub fn is_executable(self) -> bool {
        self == Self::Executable
    }
}

/// Where a rendered fragment goes, before token substitution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputTarget {
    /// Directory relative to the output root; may contain path tokens.
    pub directory: String,
    /// File name; may start with a path token.
    pub file_name: String,
    pub executable: bool,
}

impl OutputTarget {
    pub fn new(directory: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            file_name: file_name.into(),
            executable: false,
        }
    }

    pub fn executable(mut self, executable: bool) -> Self {
        self.executable = executable;
        self
    }

    /// Shell scripts are executable even when the flag is not set.
    pub fn permissions(&self) -> Permissions {
        if self.executable || self.file_name.ends_with(".sh") {
            Permissions::Executable
        } else {
            Permissions::ReadWrite
        }
    }

    /// Hook files are matched case-insensitively anywhere in the name.
    pub fn is_hook(&self) -> bool {
        self.file_name.to_lowercase().contains(HOOK_MARKER)
    }

    /// Token-substituted path relative to the output root.
    pub fn resolve(&self, tokens: &PathTokens) -> PathBuf {
        let directory = tokens.substitute_directory(self.directory.trim_matches('/'));
        let file_name = tokens.substitute_file_name(&self.file_name);
        if directory.is_empty() {
            PathBuf::from(file_name)
        } else {
            PathBuf::from(directory).join(file_name)
        }
    }
}

/// Rendered content bound for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub target: OutputTarget,
    pub content: String,
}

impl RenderedFile {
    pub fn new(target: OutputTarget, content: impl Into<String>) -> Self {
        Self {
            target,
            content: content.into(),
        }
    }
}
