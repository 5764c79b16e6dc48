use std::fmt::{Display, Formatter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FindingLevel {
    /// Something about the repository that needs fixing, like a misnamed folder.
    Warning,
    /// A step failed to run or a file failed to parse.
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Finding {
    pub level: FindingLevel,
    pub message: String,
}

impl Display for Finding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self.level {
            FindingLevel::Warning => "warning",
            FindingLevel::Error => "error",
        };
        write!(f, "{label}: {}", self.message)
    }
}

/// What a single hook step has to say. Notes are informational; any finding blocks the commit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    pub notes: Vec<String>,
    pub findings: Vec<Finding>,
}

impl StepReport {
    pub fn note(&mut self, message: impl Into<String>) {
        self.notes.push(message.into());
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.findings.push(Finding {
            level: FindingLevel::Warning,
            message: message.into(),
        });
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.findings.push(Finding {
            level: FindingLevel::Error,
            message: message.into(),
        });
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Append everything `other` reported, keeping step order.
    pub fn absorb(&mut self, other: StepReport) {
        self.notes.extend(other.notes);
        self.findings.extend(other.findings);
    }
}
