use super::Error;

/// Error when generated views depend on each other in a cycle.
///
/// Views cannot be created in any order when this happens, so the whole
/// sequencing step fails.
#[derive(Debug)]
pub(super) struct CyclicViewDependency {
    members: Vec<String>,
}

impl std::error::Error for CyclicViewDependency {}

impl core::fmt::Display for CyclicViewDependency {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("cyclic view dependency: ")?;
        for member in &self.members {
            write!(f, "{member} -> ")?;
        }
        match self.members.first() {
            Some(first) => f.write_str(first),
            None => Ok(()),
        }
    }
}

impl Error {
    /// Creates a cyclic view dependency error. `members` lists the views on
    /// the cycle in dependency order.
    pub fn cyclic_view_dependency(members: Vec<String>) -> Error {
        Error::from(super::ErrorKind::CyclicViewDependency(CyclicViewDependency {
            members,
        }))
    }

    /// Returns `true` if this error is a cyclic view dependency error.
    pub fn is_cyclic_view_dependency(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::CyclicViewDependency(_))
    }

    /// Views on the cycle, if this is a cyclic view dependency error.
    pub fn cycle_members(&self) -> Option<&[String]> {
        match self.kind() {
            super::ErrorKind::CyclicViewDependency(err) => Some(&err.members),
            _ => None,
        }
    }
}
