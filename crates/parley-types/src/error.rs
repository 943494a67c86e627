use thiserror::Error;

/// Errors from repository operations (used by the store traits in parley-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("query error: {0}")]
    Query(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors raised while building the interface registry at startup.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("clash of interfaces: alias '{alias}' is already registered")]
    AliasCollision { alias: String },

    #[error("interface declares no aliases")]
    NoAliases,
}

/// Errors an interface may return from `consume`.
#[derive(Debug, Error)]
pub enum InterfaceError {
    #[error("task failed: {0}")]
    TaskFailed(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Errors surfaced by a dialog session turn.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("conversation store error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("interface '{subject}' failed: {source}")]
    Interface {
        subject: String,
        #[source]
        source: InterfaceError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_collision_display() {
        let err = RegistryError::AliasCollision {
            alias: "help".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "clash of interfaces: alias 'help' is already registered"
        );
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_chat_error_from_repository() {
        let err: ChatError = RepositoryError::Query("disk I/O error".to_string()).into();
        assert!(matches!(err, ChatError::Repository(_)));
        assert!(err.to_string().contains("disk I/O error"));
    }

    #[test]
    fn test_chat_error_interface_names_subject() {
        let err = ChatError::Interface {
            subject: "add partner".to_string(),
            source: InterfaceError::TaskFailed("boom".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("add partner"));
        assert!(msg.contains("boom"));
    }
}
