use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use uuid::Uuid;

use crate::{
    config::Merchant,
    gateway::{Result, error::GatewayError},
};

const MERCHANT_ID: HeaderName = HeaderName::from_static("merchantid");
const MERCHANT_KEY: HeaderName = HeaderName::from_static("merchantkey");
const REQUEST_ID: HeaderName = HeaderName::from_static("requestid");

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| GatewayError::Serialization(format!("{name} is not a valid header value")))
}

pub fn authenticated_headers(merchant: &Merchant, request_id: Uuid) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    map.insert(MERCHANT_ID, header_value("MerchantId", merchant.id())?);
    let mut key = header_value("MerchantKey", merchant.key())?;
    key.set_sensitive(true);
    map.insert(MERCHANT_KEY, key);
    map.insert(
        REQUEST_ID,
        header_value("RequestId", &request_id.hyphenated().to_string())?,
    );
    map.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    map.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    Ok(map)
}
