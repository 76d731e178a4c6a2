use crate::password::{generate, PasswordPolicy};
use crate::query::{decode, DecodeMode};
use crate::response::Response;

/// always answers 200, a bad length only adds a warning line
pub fn password(raw_query: &str) -> Response {
    // lenient decoding never fails
    let params = decode(raw_query, DecodeMode::Lenient).unwrap_or_default();
    let (policy, warning) = PasswordPolicy::from_query(&params);

    let mut body = generate(&policy);
    if let Some(warning) = warning {
        log::debug!("password request {}: {}", params, warning);
        body.push('\n');
        body.push_str(&warning);
    }

    Response::ok_text(body)
}
