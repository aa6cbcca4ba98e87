use std::path::PathBuf;

/// Tracked name of the always-running registry process.
pub const REGISTRY: &str = "registry";

/// Suffix carried by every helper's tracked name.
pub const HELPER_SUFFIX: &str = "-helper";

/// A service declared by a `<name>.cf` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredConfig {
    pub name: String,
    pub path: PathBuf,
    pub content: Vec<u8>,
}

/// Markers found inside a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigMeta {
    pub service_type: Option<String>,
    pub flags: Vec<String>,
}

impl ConfigMeta {
    #[must_use]
    pub fn is_autoboot(&self, autoboot_types: &[String]) -> bool {
        self.service_type
            .as_ref()
            .is_some_and(|tag| autoboot_types.iter().any(|t| t == tag))
    }
}

/// An attachment helper derived from a service's `FLAGS:` line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Helper {
    pub service: String,
    pub role: String,
}

impl Helper {
    #[must_use]
    pub fn new(service: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            role: role.into(),
        }
    }

    /// `<service>/<role>`, used in log output.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}/{}", self.service, self.role)
    }

    /// Argument handed to the attachment helper, `<role>-helper`.
    #[must_use]
    pub fn role_arg(&self) -> String {
        format!("{}{HELPER_SUFFIX}", self.role)
    }

    /// Name under which the helper's PID record is kept.
    #[must_use]
    pub fn tracked_name(&self) -> String {
        format!("{}-{}", self.service, self.role_arg())
    }
}

#[must_use]
pub fn is_helper(name: &str) -> bool {
    name.ends_with(HELPER_SUFFIX)
}

/// Strips the site prefix from a service name.
#[must_use]
pub fn base_name<'a>(name: &'a str, prefix: &str) -> &'a str {
    if prefix.is_empty() {
        return name;
    }
    name.strip_prefix(prefix).unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helper_names() {
        let helper = Helper::new("lab-blade3", "reboot");
        assert_eq!(helper.label(), "lab-blade3/reboot");
        assert_eq!(helper.role_arg(), "reboot-helper");
        assert_eq!(helper.tracked_name(), "lab-blade3-reboot-helper");
        assert!(is_helper(&helper.tracked_name()));
        assert!(!is_helper(REGISTRY));
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("lab-blade3", "lab-"), "blade3");
        assert_eq!(base_name("blade3", "lab-"), "blade3");
        assert_eq!(base_name("lab-blade3", ""), "lab-blade3");
    }

    #[test]
    fn test_is_autoboot() {
        let types = vec!["autoboot".to_owned()];
        let meta = ConfigMeta {
            service_type: Some("autoboot".to_owned()),
            flags: vec![],
        };
        assert!(meta.is_autoboot(&types));
        assert!(!ConfigMeta::default().is_autoboot(&types));
        let other = ConfigMeta {
            service_type: Some("manual".to_owned()),
            flags: vec!["reboot".to_owned()],
        };
        assert!(!other.is_autoboot(&types));
    }
}
