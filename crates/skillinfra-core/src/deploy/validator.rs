//! Shape checks for a fully successful aggregate result.

use crate::delegate::DeployDelegate;
use crate::error::ShapeError;
use crate::strings::is_non_blank;
use crate::types::AggregateDeployResult;

/// Run the delegate's contract check.
pub fn validate(
    delegate: &dyn DeployDelegate,
    result: &AggregateDeployResult,
) -> Result<(), ShapeError> {
    delegate.validate_response(result)?;
    tracing::debug!(regions = result.len(), "deploy result passed validation");
    Ok(())
}

/// Every region must expose an endpoint whose `url` is an absolute URI
/// (an `https://` URL or a resource name such as `arn:aws:lambda:...`).
pub fn validate_endpoints(result: &AggregateDeployResult) -> Result<(), ShapeError> {
    for (region, invoke_result) in result {
        let endpoint = invoke_result
            .endpoint
            .as_ref()
            .ok_or_else(|| ShapeError::new(region, "endpoint is missing"))?;
        if !is_non_blank(&endpoint.url) {
            return Err(ShapeError::new(region, "endpoint url is blank"));
        }
        url::Url::parse(&endpoint.url).map_err(|e| {
            ShapeError::new(
                region,
                format!("endpoint url \"{}\" is not an absolute URI: {}", endpoint.url, e),
            )
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Endpoint, InvokeResult};
    use serde_json::json;

    fn result_with(region: &str, endpoint: Option<&str>) -> AggregateDeployResult {
        let mut result = AggregateDeployResult::new();
        result.insert(
            region.to_string(),
            InvokeResult {
                endpoint: endpoint.map(Endpoint::new),
                deploy_state: json!({}),
                ..InvokeResult::default()
            },
        );
        result
    }

    #[test]
    fn accepts_https_and_arn_endpoints() {
        let mut result = result_with("default", Some("https://example.com/skill"));
        result.extend(result_with(
            "EU",
            Some("arn:aws:lambda:eu-west-1:123456789012:function:hello"),
        ));
        assert!(validate_endpoints(&result).is_ok());
    }

    #[test]
    fn missing_endpoint_is_rejected() {
        let err = validate_endpoints(&result_with("NA", None)).unwrap_err();
        assert_eq!(err.region, "NA");
        assert_eq!(err.rule, "endpoint is missing");
    }

    #[test]
    fn blank_endpoint_is_rejected() {
        let err = validate_endpoints(&result_with("NA", Some("   "))).unwrap_err();
        assert_eq!(err.rule, "endpoint url is blank");
    }

    #[test]
    fn relative_endpoint_is_rejected() {
        let err = validate_endpoints(&result_with("FE", Some("lambda/handler"))).unwrap_err();
        assert!(err.rule.contains("not an absolute URI"));
    }
}
