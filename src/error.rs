use thiserror::Error;

pub type Result<T> = std::result::Result<T, LtfsCmdError>;

#[derive(Error, Debug)]
pub enum LtfsCmdError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SCSI operation error: {0}")]
    Scsi(String),

    #[error("Tape device error: {0}")]
    TapeDevice(String),

    #[error("Mapping error: {0}")]
    Mapping(String),

    #[error("Service error: {0}")]
    Service(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("System error: {0}")]
    System(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Parameter validation error: {0}")]
    ParameterValidation(String),

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl LtfsCmdError {
    pub fn scsi<T: Into<String>>(msg: T) -> Self {
        Self::Scsi(msg.into())
    }

    pub fn tape_device<T: Into<String>>(msg: T) -> Self {
        Self::TapeDevice(msg.into())
    }

    pub fn mapping<T: Into<String>>(msg: T) -> Self {
        Self::Mapping(msg.into())
    }

    pub fn service<T: Into<String>>(msg: T) -> Self {
        Self::Service(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::Config(msg.into())
    }

    pub fn system<T: Into<String>>(msg: T) -> Self {
        Self::System(msg.into())
    }

    pub fn unsupported<T: Into<String>>(msg: T) -> Self {
        Self::Unsupported(msg.into())
    }

    pub fn parameter_validation<T: Into<String>>(msg: T) -> Self {
        Self::ParameterValidation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let scsi_error = LtfsCmdError::scsi("INQUIRY failed");
        assert!(matches!(scsi_error, LtfsCmdError::Scsi(_)));

        let mapping_error = LtfsCmdError::mapping("T: already mapped");
        assert!(matches!(mapping_error, LtfsCmdError::Mapping(_)));
        assert_eq!(mapping_error.to_string(), "Mapping error: T: already mapped");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: LtfsCmdError = io.into();
        assert!(matches!(err, LtfsCmdError::Io(_)));
    }
}
