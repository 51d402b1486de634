//! Entity addressing by id or name.

use std::fmt;

use crate::errors::Error;
use crate::state::{BridgeState, Category};

type Result<T> = std::result::Result<T, Error>;

/// A reference to one entity, either by bridge id or by name.
///
/// Strings made only of digits are ids; anything else is a name.
///
/// ```
/// use hue_lights_rs::Target;
///
/// assert_eq!(Target::from(3u32), Target::Id("3".into()));
/// assert_eq!(Target::from("3"), Target::Id("3".into()));
/// assert_eq!(Target::from("Kitchen"), Target::Name("Kitchen".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Id(String),
    Name(String),
}

impl Target {
    pub fn as_str(&self) -> &str {
        match self {
            Target::Id(id) | Target::Name(id) => id,
        }
    }

    pub fn is_name(&self) -> bool {
        matches!(self, Target::Name(_))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<u32> for Target {
    fn from(id: u32) -> Self {
        Target::Id(id.to_string())
    }
}

impl From<&str> for Target {
    fn from(value: &str) -> Self {
        if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
            Target::Id(value.to_string())
        } else {
            Target::Name(value.to_string())
        }
    }
}

impl From<String> for Target {
    fn from(value: String) -> Self {
        Target::from(value.as_str())
    }
}

impl From<&String> for Target {
    fn from(value: &String) -> Self {
        Target::from(value.as_str())
    }
}

impl From<&Target> for Target {
    fn from(value: &Target) -> Self {
        value.clone()
    }
}

/// One or more targets of a write operation.
///
/// ```
/// use hue_lights_rs::Targets;
///
/// assert_eq!(Targets::from(1u32).len(), 1);
/// assert_eq!(Targets::from([1u32, 2]).len(), 2);
/// assert_eq!(Targets::from(vec!["Desk", "3"]).len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Targets(Vec<Target>);

impl Targets {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.0.iter()
    }

    pub(crate) fn has_names(&self) -> bool {
        self.0.iter().any(Target::is_name)
    }
}

impl From<Target> for Targets {
    fn from(target: Target) -> Self {
        Targets(vec![target])
    }
}

impl From<u32> for Targets {
    fn from(id: u32) -> Self {
        Targets(vec![Target::from(id)])
    }
}

impl From<&str> for Targets {
    fn from(value: &str) -> Self {
        Targets(vec![Target::from(value)])
    }
}

impl From<String> for Targets {
    fn from(value: String) -> Self {
        Targets(vec![Target::from(value)])
    }
}

impl<T: Into<Target>> From<Vec<T>> for Targets {
    fn from(values: Vec<T>) -> Self {
        Targets(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Target>, const N: usize> From<[T; N]> for Targets {
    fn from(values: [T; N]) -> Self {
        Targets(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Target> + Clone> From<&[T]> for Targets {
    fn from(values: &[T]) -> Self {
        Targets(values.iter().cloned().map(Into::into).collect())
    }
}

/// Resolve a target to the id of an entity present in `state`.
///
/// Names are matched exactly against the `name` field; the first match in
/// ascending id order wins. For scenes, whose ids are not numeric, a name
/// that is also an existing key is taken as the id.
pub fn resolve(state: &BridgeState, category: Category, target: &Target) -> Result<String> {
    match target {
        Target::Id(id) => state
            .entity(category, id)
            .map(|_| id.clone())
            .ok_or_else(|| Error::not_found(category, id)),
        Target::Name(name) => {
            if !category.numeric_ids() && state.entity(category, name).is_some() {
                return Ok(name.clone());
            }
            state
                .find_by_name(category, name)
                .ok_or_else(|| Error::not_found(category, name))
        }
    }
}

/// Resolve a write target: ids pass through unchecked, names must match.
pub(crate) fn resolve_for_write(
    state: Option<&BridgeState>,
    category: Category,
    target: &Target,
) -> Result<String> {
    match (target, state) {
        (Target::Id(id), _) => Ok(id.clone()),
        (Target::Name(_), Some(state)) => resolve(state, category, target),
        (Target::Name(name), None) => Err(Error::not_found(category, name)),
    }
}
