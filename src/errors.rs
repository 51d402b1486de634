use crate::response::ApiError;
use crate::state::Category;

/// All error types that can occur when talking to a Hue bridge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to serialize data to JSON.
    #[error("failed to dump json: {0:?}")]
    JsonDump(serde_json::Error),

    /// Failed to deserialize JSON data.
    #[error("failed to load json: {0:?}")]
    JsonLoad(serde_json::Error),

    /// The HTTP request could not be completed.
    #[error("{method} request to {url} failed: {err}")]
    Http {
        method: String,
        url: String,
        err: reqwest::Error,
    },

    /// The bridge did not answer within the configured timeout.
    #[error("{method} request to {url} timed out")]
    RequestTimeout { method: String, url: String },

    /// The bridge answered with a non-success HTTP status.
    #[error("{method} request to {url} failed with status code {status}")]
    Status {
        method: String,
        url: String,
        status: u16,
    },

    /// Registration was rejected, usually because the link button was not pressed.
    #[error("registration failed: {0}")]
    Registration(ApiError),

    /// An operation that needs a username was attempted before [`crate::Bridge::connect`].
    #[error("not registered with the bridge; call connect() first")]
    Authentication,

    /// The bridge returned a structured API error.
    #[error("bridge error {}: {}", .0.kind, .0.description)]
    Bridge(ApiError),

    /// No entity in the category matches the given id or name.
    #[error("{category} {target:?} not found")]
    NotFound { category: Category, target: String },

    /// The entity exists but has no such attribute.
    #[error("{category} {id} has no attribute {attribute:?}")]
    AttributeNotFound {
        category: Category,
        id: String,
        attribute: String,
    },

    /// The bridge answered with JSON of an unexpected shape.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// A value was outside the range accepted by the bridge.
    #[error("invalid value for {attribute}: {reason}")]
    InvalidValue { attribute: String, reason: String },
}

impl Error {
    /// Create a new transport error, separating timeouts from other failures.
    pub fn transport(method: &str, url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::RequestTimeout {
                method: method.to_string(),
                url: url.to_string(),
            }
        } else {
            Error::Http {
                method: method.to_string(),
                url: url.to_string(),
                err,
            }
        }
    }

    /// Create a new not found error
    pub fn not_found(category: Category, target: &str) -> Self {
        Error::NotFound {
            category,
            target: target.to_string(),
        }
    }

    /// Create a new attribute not found error
    pub fn attribute_not_found(category: Category, id: &str, attribute: &str) -> Self {
        Error::AttributeNotFound {
            category,
            id: id.to_string(),
            attribute: attribute.to_string(),
        }
    }

    /// Create a new invalid value error
    pub fn invalid_value(attribute: &str, reason: &str) -> Self {
        Error::InvalidValue {
            attribute: attribute.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::RequestTimeout { .. })
    }

    /// Returns `true` when the link button has to be pressed before retrying.
    pub fn is_link_button(&self) -> bool {
        matches!(self, Error::Registration(err) if err.kind == ApiError::LINK_BUTTON_NOT_PRESSED)
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = Error::not_found(Category::Lights, "Kitchen");
        assert_eq!(err.to_string(), "lights \"Kitchen\" not found");
    }

    #[test]
    fn test_link_button() {
        let err = Error::Registration(ApiError::new(101, "", "link button not pressed"));
        assert!(err.is_link_button());
        assert!(!Error::Registration(ApiError::new(7, "", "invalid value")).is_link_button());
        assert!(!Error::Authentication.is_link_button());
    }

    #[test]
    fn test_registration_message() {
        let err = Error::Registration(ApiError::new(101, "", "link button not pressed"));
        assert_eq!(
            err.to_string(),
            "registration failed: error 101: link button not pressed"
        );
    }

    #[test]
    fn test_equality_by_message() {
        assert_eq!(
            Error::attribute_not_found(Category::Groups, "1", "foo"),
            Error::attribute_not_found(Category::Groups, "1", "foo")
        );
    }
}
