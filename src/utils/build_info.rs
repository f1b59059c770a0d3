use serde::Serialize;

/// Build metadata embedded by `build.rs`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BuildMetadata {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub git_status: &'static str,
    pub timestamp: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
    pub rustc: &'static str,
}

impl BuildMetadata {
    pub fn summary(&self) -> String {
        format!(
            "cadence {} ({} {}, {} {}, built {})",
            self.version, self.git_hash, self.git_status, self.target, self.profile, self.timestamp
        )
    }
}

pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("CADENCE_BUILD_HASH").unwrap_or("unknown"),
        git_status: option_env!("CADENCE_BUILD_STATUS").unwrap_or("unknown"),
        timestamp: option_env!("CADENCE_BUILD_TIMESTAMP").unwrap_or("unknown"),
        target: option_env!("CADENCE_BUILD_TARGET").unwrap_or("unknown"),
        profile: option_env!("CADENCE_BUILD_PROFILE").unwrap_or("unknown"),
        rustc: option_env!("CADENCE_BUILD_RUSTC").unwrap_or("unknown"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_names_the_package_version() {
        let meta = current();
        assert_eq!(meta.version, env!("CARGO_PKG_VERSION"));
        assert!(meta.summary().starts_with(&format!("cadence {}", meta.version)));
    }
}
