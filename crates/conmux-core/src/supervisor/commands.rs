use crate::error::Error;

/// What a single invocation does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SupervisorCommand {
    /// Converge the running set toward the declared configurations.
    #[default]
    Start,
    /// Stop every tracked process.
    Stop,
    /// Query the status of every tracked console.
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorEvent {
    Started { name: String, pid: u32 },
    AlreadyRunning { name: String, pid: u32 },
    ConfigChanged { name: String },
    Stopped { name: String, pid: Option<u32> },
    Failed { name: String, message: String },
    Status { base: String, line: String },
}

/// Everything that happened during one pass, in order.
#[derive(Debug, Default)]
pub struct PassReport {
    pub events: Vec<SupervisorEvent>,
}

impl PassReport {
    pub(crate) fn push(&mut self, event: SupervisorEvent) {
        self.events.push(event);
    }

    pub(crate) fn fail(&mut self, name: &str, err: &Error) {
        tracing::error!("`{name}`: {err}");
        self.events.push(SupervisorEvent::Failed {
            name: name.to_owned(),
            message: err.to_string(),
        });
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, SupervisorEvent::Failed { .. }))
    }

    #[must_use]
    pub fn started(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SupervisorEvent::Started { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn stopped(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SupervisorEvent::Stopped { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}
