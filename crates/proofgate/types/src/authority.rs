use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{TypesError, TypesResult};

/// The four ranked authority classes.
///
/// Ranks are strictly ordered and fixed: a class may refute itself and
/// every class of equal-or-lower rank, never a higher one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthorityClass {
    User = 1,
    Project = 2,
    Constitutional = 3,
    SystemRoot = 4,
}

impl AuthorityClass {
    /// All classes, lowest rank first.
    pub const ALL: [AuthorityClass; 4] = [
        AuthorityClass::User,
        AuthorityClass::Project,
        AuthorityClass::Constitutional,
        AuthorityClass::SystemRoot,
    ];

    pub fn level(&self) -> u8 {
        *self as u8
    }

    pub fn from_level(level: u8) -> TypesResult<Self> {
        match level {
            1 => Ok(Self::User),
            2 => Ok(Self::Project),
            3 => Ok(Self::Constitutional),
            4 => Ok(Self::SystemRoot),
            other => Err(TypesError::UnknownAuthorityLevel(other)),
        }
    }

    /// Classes this authority may refute: itself and everything ranked below.
    pub fn refutation_set(&self) -> Vec<AuthorityClass> {
        Self::ALL
            .iter()
            .copied()
            .filter(|c| c.level() <= self.level())
            .collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Project => "PROJECT",
            Self::Constitutional => "CONSTITUTIONAL",
            Self::SystemRoot => "SYSTEM_ROOT",
        }
    }
}

impl fmt::Display for AuthorityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_strictly_ordered() {
        let levels: Vec<u8> = AuthorityClass::ALL.iter().map(|c| c.level()).collect();
        assert_eq!(levels, vec![1, 2, 3, 4]);
        assert!(AuthorityClass::User < AuthorityClass::SystemRoot);
    }

    #[test]
    fn refutation_set_is_equal_or_lower() {
        assert_eq!(
            AuthorityClass::User.refutation_set(),
            vec![AuthorityClass::User]
        );
        assert_eq!(
            AuthorityClass::Constitutional.refutation_set(),
            vec![
                AuthorityClass::User,
                AuthorityClass::Project,
                AuthorityClass::Constitutional
            ]
        );
        assert_eq!(AuthorityClass::SystemRoot.refutation_set().len(), 4);
    }

    #[test]
    fn from_level_round_trip() {
        for class in AuthorityClass::ALL {
            assert_eq!(AuthorityClass::from_level(class.level()).unwrap(), class);
        }
        assert!(AuthorityClass::from_level(0).is_err());
        assert!(AuthorityClass::from_level(5).is_err());
    }

    #[test]
    fn serde_names() {
        let json = serde_json::to_string(&AuthorityClass::SystemRoot).unwrap();
        assert_eq!(json, "\"SYSTEM_ROOT\"");
    }
}
