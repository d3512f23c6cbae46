#![forbid(unsafe_code)]

//! Validated identifiers for caller-supplied identities.
//!
//! Store and employee ids are issued by collaborator systems (membership,
//! identity); the core only requires that they are non-empty, bounded, and
//! made of characters safe to round-trip through SQL text columns and JSON.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IdError {
    Empty,
    TooLong,
    InvalidFirstChar,
    InvalidChar { ch: char, index: usize },
}

impl std::fmt::Display for IdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "id is empty"),
            Self::TooLong => write!(f, "id exceeds 128 characters"),
            Self::InvalidFirstChar => write!(f, "id must start with an ascii alphanumeric"),
            Self::InvalidChar { ch, index } => {
                write!(f, "invalid character {ch:?} at index {index}")
            }
        }
    }
}

impl std::error::Error for IdError {}

fn validate_id(value: &str) -> Result<(), IdError> {
    if value.is_empty() {
        return Err(IdError::Empty);
    }
    if value.len() > 128 {
        return Err(IdError::TooLong);
    }
    let Some(first) = value.chars().next() else {
        return Err(IdError::Empty);
    };
    if !first.is_ascii_alphanumeric() {
        return Err(IdError::InvalidFirstChar);
    }
    for (index, ch) in value.chars().enumerate() {
        if index == 0 {
            continue;
        }
        if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
            continue;
        }
        return Err(IdError::InvalidChar { ch, index });
    }
    Ok(())
}

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            pub fn try_new(value: impl Into<String>) -> Result<Self, IdError> {
                let value = value.into();
                validate_id(&value)?;
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

define_id! {
    /// A store within a tenant, as known to the membership collaborator.
    StoreId
}

define_id! {
    /// An employee (user) id, as known to the identity collaborator.
    EmployeeId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_uuid_like_and_slug_ids() {
        assert!(StoreId::try_new("0d9af6a4-9c1b-4f6e-8f7d-2b8a1c3d4e5f").is_ok());
        assert!(EmployeeId::try_new("emp_42.main-a").is_ok());
    }

    #[test]
    fn rejects_empty_and_bad_chars() {
        assert_eq!(StoreId::try_new(""), Err(IdError::Empty));
        assert_eq!(StoreId::try_new("-abc"), Err(IdError::InvalidFirstChar));
        assert_eq!(
            EmployeeId::try_new("a b"),
            Err(IdError::InvalidChar { ch: ' ', index: 1 })
        );
        assert!(StoreId::try_new("x".repeat(129)).is_err());
    }
}
