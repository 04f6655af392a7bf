//! HTTP methods and the fixed set of semantic action names

use crate::{ModelDefError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic action assigned to an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionName {
    Create,
    Update,
    GetMany,
    GetOne,
    GetCount,
    Delete,
}

impl ActionName {
    /// Every action a connection model definition may carry
    pub const ALL: [ActionName; 6] = [
        ActionName::Create,
        ActionName::Update,
        ActionName::GetMany,
        ActionName::GetOne,
        ActionName::GetCount,
        ActionName::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionName::Create => "create",
            ActionName::Update => "update",
            ActionName::GetMany => "getMany",
            ActionName::GetOne => "getOne",
            ActionName::GetCount => "getCount",
            ActionName::Delete => "delete",
        }
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionName {
    type Err = ModelDefError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| ModelDefError::InvalidAction(s.to_string()))
    }
}

/// HTTP methods that can appear under a Swagger path item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl HttpMethod {
    /// Lower-case form, as used for path item keys
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
            HttpMethod::Head => "head",
        }
    }

    /// Upper-case form, as sent on the wire
    pub fn as_upper(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_upper())
    }
}

impl FromStr for HttpMethod {
    type Err = ModelDefError;

    /// Case-insensitive; anything outside the supported set is rejected
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            "put" => Ok(HttpMethod::Put),
            "patch" => Ok(HttpMethod::Patch),
            "delete" => Ok(HttpMethod::Delete),
            "head" => Ok(HttpMethod::Head),
            _ => Err(ModelDefError::UnsupportedMethod(s.to_string())),
        }
    }
}

impl Serialize for HttpMethod {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_upper())
    }
}

impl<'de> Deserialize<'de> for HttpMethod {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_name_round_trips_through_text() {
        for action in ActionName::ALL {
            assert_eq!(action.as_str().parse::<ActionName>().unwrap(), action);
        }
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let err = "list".parse::<ActionName>().unwrap_err();
        assert!(matches!(err, ModelDefError::InvalidAction(ref a) if a == "list"));
        assert!("GetMany".parse::<ActionName>().is_err());
    }

    #[test]
    fn test_action_serializes_camel_case() {
        assert_eq!(
            serde_json::to_value(ActionName::GetCount).unwrap(),
            serde_json::json!("getCount")
        );
    }

    #[test]
    fn test_http_method_parsing() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("PATCH".parse::<HttpMethod>().unwrap(), HttpMethod::Patch);
        assert!(matches!(
            "options".parse::<HttpMethod>(),
            Err(ModelDefError::UnsupportedMethod(_))
        ));
        assert!("trace".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_http_method_serializes_upper_case() {
        assert_eq!(
            serde_json::to_value(HttpMethod::Delete).unwrap(),
            serde_json::json!("DELETE")
        );
    }
}
