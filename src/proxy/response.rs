//! Responses handed to the fetch/cache transport

use serde::Serialize;

use crate::proxy::batch::Resolution;

/// Status code of every failure response
pub const NOT_FOUND_CODE: u16 = 404;

/// Body of every failure response; the actual cause is only logged
pub const NOT_FOUND_BODY: &str = r#"{"error":"Not Found"}"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProxyResponse {
    Fetch { urls: Vec<String> },
    Redirect { redirect: String },
    Failure { headers: FailureHeaders, body: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureHeaders {
    pub code: u16,
}

impl ProxyResponse {
    pub fn not_found() -> Self {
        ProxyResponse::Failure {
            headers: FailureHeaders {
                code: NOT_FOUND_CODE,
            },
            body: NOT_FOUND_BODY.to_string(),
        }
    }
}

impl From<Resolution> for ProxyResponse {
    fn from(resolution: Resolution) -> Self {
        match resolution {
            Resolution::Fetch(urls) => ProxyResponse::Fetch { urls },
            Resolution::Redirect(redirect) => ProxyResponse::Redirect { redirect },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn not_found_serializes_generic_failure() {
        assert_eq!(
            serde_json::to_value(ProxyResponse::not_found()).unwrap(),
            json!({ "headers": { "code": 404 }, "body": "{\"error\":\"Not Found\"}" })
        );
    }

    #[test]
    fn redirect_serializes_as_redirect_instruction() {
        let response = ProxyResponse::from(Resolution::Redirect("../a@1.0.0/b/".to_string()));

        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({ "redirect": "../a@1.0.0/b/" })
        );
    }

    #[test]
    fn fetch_serializes_url_list() {
        let response =
            ProxyResponse::from(Resolution::Fetch(vec!["cdnjs:a@1.0.0/a.js".to_string()]));

        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({ "urls": ["cdnjs:a@1.0.0/a.js"] })
        );
    }
}
