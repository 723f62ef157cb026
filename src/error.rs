use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    Parse(String),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, thiserror::Error)]
pub enum OrreryError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("surface creation failed: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible graphics adapter found")]
    Adapter,

    #[error("device request failed: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/orrery.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/orrery.toml");

        let err = ConfigError::Parse("expected `=`".into());
        assert_eq!(err.to_string(), "config parse error: expected `=`");

        let err = ConfigError::Validation("star_count must be >= 1".into());
        assert_eq!(
            err.to_string(),
            "config validation error: star_count must be >= 1"
        );
    }

    #[test]
    fn orrery_error_from_config_is_transparent() {
        let err: OrreryError = ConfigError::Parse("bad toml".into()).into();
        assert!(matches!(err, OrreryError::Config(_)));
        assert_eq!(err.to_string(), "config parse error: bad toml");
    }

    #[test]
    fn orrery_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: OrreryError = io.into();
        assert!(matches!(err, OrreryError::Io(_)));
        assert!(err.to_string().contains("read-only"));
    }

    #[test]
    fn adapter_error_display() {
        assert_eq!(
            OrreryError::Adapter.to_string(),
            "no compatible graphics adapter found"
        );
    }
}
