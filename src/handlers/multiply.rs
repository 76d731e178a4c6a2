use super::HandlerError;
use crate::query::{decode, DecodeMode};
use crate::response::Response;

pub const MISSING_OPERANDS: &str = "Both num1 and num2 parameters are required.";
pub const INVALID_OPERANDS: &str = "Both num1 and num2 must be valid integers.";
pub const PRODUCT_OUT_OF_RANGE: &str = "The product of num1 and num2 is out of range.";

pub fn multiply(raw_query: &str) -> Result<Response, HandlerError> {
    let params = decode(raw_query, DecodeMode::Strict)?;

    let (num1, num2) = match (params.get("num1"), params.get("num2")) {
        (Some(a), Some(b)) => (a, b),
        _ => return Err(HandlerError::MissingParameter(MISSING_OPERANDS.to_string())),
    };

    let num1: i64 = num1
        .parse()
        .map_err(|_| HandlerError::InvalidNumber(INVALID_OPERANDS.to_string()))?;
    let num2: i64 = num2
        .parse()
        .map_err(|_| HandlerError::InvalidNumber(INVALID_OPERANDS.to_string()))?;

    let product = num1
        .checked_mul(num2)
        .ok_or_else(|| HandlerError::InvalidNumber(PRODUCT_OUT_OF_RANGE.to_string()))?;

    Ok(Response::ok_html(format!("Result is: {}", product)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiply() {
        let response = multiply("num1=3&num2=4").unwrap();
        assert_eq!(response.status.code(), 200);
        assert_eq!(response.body_text(), "Result is: 12");

        let response = multiply("num2=-7&num1=6").unwrap();
        assert_eq!(response.body_text(), "Result is: -42");
    }

    #[test]
    fn test_trailing_ampersand() {
        let response = multiply("num1=3&num2=4&").unwrap();
        assert_eq!(response.body_text(), "Result is: 12");
    }

    #[test]
    fn test_missing_operand() {
        let err = multiply("num1=3").unwrap_err();
        assert_eq!(err, HandlerError::MissingParameter(MISSING_OPERANDS.to_string()));
        assert_eq!(err.into_response().status.code(), 400);
    }

    #[test]
    fn test_not_an_integer() {
        let err = multiply("num1=a&num2=4").unwrap_err();
        assert_eq!(err, HandlerError::InvalidNumber(INVALID_OPERANDS.to_string()));

        let err = multiply("num1=&num2=4").unwrap_err();
        assert_eq!(err, HandlerError::InvalidNumber(INVALID_OPERANDS.to_string()));
    }

    #[test]
    fn test_overflow() {
        let err = multiply("num1=9223372036854775807&num2=2").unwrap_err();
        assert_eq!(err, HandlerError::InvalidNumber(PRODUCT_OUT_OF_RANGE.to_string()));
    }

    #[test]
    fn test_malformed_query() {
        let err = multiply("num1=3&num2").unwrap_err();
        assert!(matches!(err, HandlerError::MalformedQuery(_)));
    }
}
