use std::env::{self, VarError};

use crate::domain::AppError;
use crate::ports::EnvironmentReader;

/// Reads variables from the current process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl EnvironmentReader for ProcessEnvironment {
    fn var(&self, key: &str) -> Result<Option<String>, AppError> {
        match env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(_)) => Err(AppError::config_error(format!(
                "Environment variable {} is not valid UTF-8",
                key
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEY: &str = "RECIPES_INFRA_TEST_VAR";

    struct EnvVarGuard {
        key: &'static str,
        original: Option<std::ffi::OsString>,
    }

    impl EnvVarGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let original = env::var_os(key);
            unsafe { env::set_var(key, value) };
            Self { key, original }
        }

        fn remove(key: &'static str) -> Self {
            let original = env::var_os(key);
            unsafe { env::remove_var(key) };
            Self { key, original }
        }
    }

    impl Drop for EnvVarGuard {
        fn drop(&mut self) {
            match self.original.as_ref() {
                Some(original) => unsafe { env::set_var(self.key, original) },
                None => unsafe { env::remove_var(self.key) },
            }
        }
    }

    #[test]
    #[serial]
    fn unset_variable_is_none() {
        let _guard = EnvVarGuard::remove(KEY);
        assert_eq!(ProcessEnvironment.var(KEY).unwrap(), None);
    }

    #[test]
    #[serial]
    fn set_variable_is_returned() {
        let _guard = EnvVarGuard::set(KEY, "v1");
        assert_eq!(ProcessEnvironment.var(KEY).unwrap(), Some("v1".to_string()));
    }

    #[test]
    #[serial]
    fn image_tag_from_process_drives_declaration() {
        let _guard = EnvVarGuard::set(crate::ports::IMAGE_TAG_VAR, "from-process");
        let manifest = crate::app::api::declare_from_sources(&Default::default()).unwrap();
        let json = manifest.to_json().unwrap();
        assert!(json.contains("danieltimko/recipes-rs:from-process"));
    }
}
