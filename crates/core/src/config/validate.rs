use super::{types::Config, ConfigError};

const MAX_CRF: u8 = 51;

/// Validate configuration
/// Currently validates:
/// - At least one batch worker
/// - CRF values within the x264 range
/// - Extensions are non-empty and given without a leading dot
/// - Every policy container allows at least one video codec
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.batch.max_workers == 0 {
        return Err(ConfigError::ValidationError(
            "batch.max_workers must be at least 1".to_string(),
        ));
    }

    if config.encode.crf > MAX_CRF {
        return Err(ConfigError::ValidationError(format!(
            "encode.crf must be between 0 and {}",
            MAX_CRF
        )));
    }

    if config.profile.crf > MAX_CRF {
        return Err(ConfigError::ValidationError(format!(
            "profile.crf must be between 0 and {}",
            MAX_CRF
        )));
    }

    for (key, ext) in [
        ("batch.source_extension", &config.batch.source_extension),
        ("batch.target_extension", &config.batch.target_extension),
    ] {
        if ext.is_empty() || ext.starts_with('.') {
            return Err(ConfigError::ValidationError(format!(
                "{} must be a bare extension like \"mkv\", got {:?}",
                key, ext
            )));
        }
    }

    for (container, allow) in &config.policy.containers {
        if allow.video.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "policy.containers.{}.video cannot be empty",
                container
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::CodecAllowList;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_zero_workers_fails() {
        let mut config = Config::default();
        config.batch.max_workers = 0;
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_crf_out_of_range_fails() {
        let mut config = Config::default();
        config.encode.crf = 60;
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.profile.crf = 52;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_dotted_extension_fails() {
        let mut config = Config::default();
        config.batch.source_extension = ".mkv".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("batch.source_extension"));
    }

    #[test]
    fn test_validate_empty_video_allow_list_fails() {
        let mut config = Config::default();
        config.policy.containers.insert(
            "mov".to_string(),
            CodecAllowList {
                video: Default::default(),
                audio: ["aac".to_string()].into_iter().collect(),
            },
        );
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("policy.containers.mov.video"));
    }
}
