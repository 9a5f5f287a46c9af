use crate::error::StateStoreError;
use async_trait::async_trait;
use tracing::error;

pub mod file_store;
pub mod sled_store;

/// Durable home of the single cursor value.
#[async_trait]
pub trait CursorStore: Send + Sync {
    /// Returns the persisted value, or `None` when nothing was ever written.
    async fn load(&self) -> Result<Option<String>, StateStoreError>;

    /// Replaces the persisted value as one operation.
    async fn save(&self, value: &str) -> Result<(), StateStoreError>;

    /// Removes the persisted value. Returns `false` when there was none.
    async fn clear(&self) -> Result<bool, StateStoreError>;

    /// Human readable location, used in logs.
    fn location(&self) -> String;

    /// Reads the cursor, treating both absence and read failure as `default`.
    async fn read_or_default(&self, default: &str) -> String {
        match self.load().await {
            Ok(Some(value)) => value,
            Ok(None) => default.to_string(),
            Err(err) => {
                error!(
                    location = %self.location(),
                    %err,
                    default,
                    "Failed to read cursor, falling back to default value"
                );
                default.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    struct Broken;

    #[async_trait]
    impl CursorStore for Broken {
        async fn load(&self) -> Result<Option<String>, StateStoreError> {
            Err(StateStoreError::InvalidUtf8)
        }

        async fn save(&self, _value: &str) -> Result<(), StateStoreError> {
            Err(StateStoreError::InvalidUtf8)
        }

        async fn clear(&self) -> Result<bool, StateStoreError> {
            Ok(false)
        }

        fn location(&self) -> String {
            "broken".into()
        }
    }

    #[tokio::test]
    #[traced_test]
    async fn read_failure_degrades_to_default() {
        assert_eq!(Broken.read_or_default("0").await, "0");
        assert!(logs_contain("falling back to default value"));
    }
}
