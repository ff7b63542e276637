use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("{kind} must not be empty")]
    Empty { kind: &'static str },
    #[error("{kind} cannot contain whitespace: {value:?}")]
    Whitespace { kind: &'static str, value: String },
}

fn validate(kind: &'static str, raw: &str, allow_whitespace: bool) -> Result<(), IdError> {
    if raw.is_empty() {
        return Err(IdError::Empty { kind });
    }
    if !allow_whitespace && raw.chars().any(char::is_whitespace) {
        return Err(IdError::Whitespace {
            kind,
            value: raw.to_string(),
        });
    }
    Ok(())
}

/// Identifier of a collaboration session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(String);

impl SessionId {
    pub fn parse(raw: impl Into<String>) -> Result<Self, IdError> {
        let raw = raw.into();
        validate("session id", &raw, false)?;
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of a known user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(String);

impl UserId {
    pub fn parse(raw: impl Into<String>) -> Result<Self, IdError> {
        let raw = raw.into();
        validate("user name", &raw, false)?;
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Job identity handed out by the remote worker. Opaque; only emptiness is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(String);

impl JobId {
    pub fn parse(raw: impl Into<String>) -> Result<Self, IdError> {
        let raw = raw.into();
        validate("job id", &raw, true)?;
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_and_user_ids_reject_whitespace() {
        assert!(SessionId::parse("s1").is_ok());
        assert_eq!(
            SessionId::parse("my session"),
            Err(IdError::Whitespace {
                kind: "session id",
                value: "my session".to_string(),
            })
        );
        assert_eq!(UserId::parse(""), Err(IdError::Empty { kind: "user name" }));
        assert!(UserId::parse("alice\t").is_err());
    }

    #[test]
    fn job_ids_are_opaque_but_non_empty() {
        assert_eq!(JobId::parse("job 7").unwrap().as_str(), "job 7");
        assert!(JobId::parse("").is_err());
    }
}
