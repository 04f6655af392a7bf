//! Operation classification and action mapping
//!
//! Maps an HTTP method and path template to the semantic action a
//! connection model definition carries.

use modeldef_common::{ActionName, HttpMethod, ModelDefError, Result};

/// Methods whose action does not depend on the path
const METHOD_ACTIONS: &[(HttpMethod, ActionName)] = &[
    (HttpMethod::Post, ActionName::Create),
    (HttpMethod::Patch, ActionName::Update),
    (HttpMethod::Delete, ActionName::Delete),
    (HttpMethod::Put, ActionName::Update),
    (HttpMethod::Head, ActionName::GetOne),
];

/// Infers actions from (method, path) pairs
#[derive(Debug, Clone, Copy)]
pub struct ActionInferencer {
    method_actions: &'static [(HttpMethod, ActionName)],
    allowed: &'static [ActionName],
}

impl Default for ActionInferencer {
    fn default() -> Self {
        Self {
            method_actions: METHOD_ACTIONS,
            allowed: &ActionName::ALL,
        }
    }
}

impl ActionInferencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the actions this inferencer may produce
    pub fn with_allowed(allowed: &'static [ActionName]) -> Self {
        Self {
            allowed,
            ..Self::default()
        }
    }

    /// Infer the action for a method key and path template
    ///
    /// # Examples
    /// ```
    /// use modeldef_parser::ActionInferencer;
    /// use modeldef_common::ActionName;
    ///
    /// let inferencer = ActionInferencer::new();
    /// assert_eq!(
    ///     inferencer.infer("get", "/booking/v1/blocks").unwrap(),
    ///     ActionName::GetMany
    /// );
    /// assert_eq!(
    ///     inferencer.infer("get", "/booking/v1/blocks/{id}").unwrap(),
    ///     ActionName::GetOne
    /// );
    /// assert!(inferencer.infer("options", "/booking/v1/blocks").is_err());
    /// ```
    pub fn infer(&self, method: &str, path: &str) -> Result<ActionName> {
        self.infer_method(method.parse()?, path)
    }

    /// Infer the action for an already parsed method
    ///
    /// Fails with `InvalidAction` when the action is outside the allowed set.
    pub fn infer_method(&self, method: HttpMethod, path: &str) -> Result<ActionName> {
        let action = self.classify(method, path);
        if !self.allowed.contains(&action) {
            return Err(ModelDefError::InvalidAction(action.to_string()));
        }
        Ok(action)
    }

    fn classify(&self, method: HttpMethod, path: &str) -> ActionName {
        if let Some((_, action)) = self.method_actions.iter().find(|(m, _)| *m == method) {
            return *action;
        }

        // Only GET remains
        if path.ends_with("/$count") || path.ends_with("count") {
            ActionName::GetCount
        } else if path.contains('{') {
            ActionName::GetOne
        } else {
            ActionName::GetMany
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infer(method: &str, path: &str) -> ActionName {
        ActionInferencer::new().infer(method, path).unwrap()
    }

    #[test]
    fn test_infer_write_methods() {
        assert_eq!(infer("post", "/booking/v1/blocks"), ActionName::Create);
        assert_eq!(infer("post", "/booking/v1/blocks/{id}"), ActionName::Create);
        assert_eq!(infer("patch", "/booking/v1/blocks/{id}"), ActionName::Update);
        assert_eq!(infer("put", "/booking/v1/blocks/{id}"), ActionName::Update);
        assert_eq!(infer("delete", "/booking/v1/blocks/{id}"), ActionName::Delete);
        assert_eq!(infer("delete", "/booking/v1/blocks"), ActionName::Delete);
    }

    #[test]
    fn test_infer_read_methods() {
        assert_eq!(infer("get", "/booking/v1/blocks"), ActionName::GetMany);
        assert_eq!(infer("get", "/booking/v1/blocks/{id}"), ActionName::GetOne);
        assert_eq!(infer("head", "/booking/v1/blocks"), ActionName::GetOne);
    }

    #[test]
    fn test_infer_count() {
        assert_eq!(infer("get", "/booking/v1/blocks/$count"), ActionName::GetCount);
        assert_eq!(infer("get", "/inventory/v1/units/count"), ActionName::GetCount);
        assert_eq!(
            infer("get", "/inventory/v1/properties/{id}/count"),
            ActionName::GetCount
        );
    }

    #[test]
    fn test_method_case_is_ignored() {
        assert_eq!(infer("GET", "/booking/v1/blocks"), ActionName::GetMany);
        assert_eq!(infer("Post", "/booking/v1/blocks"), ActionName::Create);
    }

    #[test]
    fn test_unsupported_methods() {
        let inferencer = ActionInferencer::new();
        for method in ["options", "trace", "connect", "parameters"] {
            assert!(matches!(
                inferencer.infer(method, "/booking/v1/blocks"),
                Err(ModelDefError::UnsupportedMethod(ref m)) if m == method
            ));
        }
    }

    #[test]
    fn test_restricted_action_set_is_enforced() {
        let inferencer = ActionInferencer::with_allowed(&[ActionName::Create]);
        assert!(inferencer.infer("post", "/x").is_ok());
        assert!(matches!(
            inferencer.infer_method(HttpMethod::Delete, "/x/{id}"),
            Err(ModelDefError::InvalidAction(ref a)) if a == "delete"
        ));
        assert!(matches!(
            inferencer.infer("get", "/x"),
            Err(ModelDefError::InvalidAction(ref a)) if a == "getMany"
        ));
    }
}
