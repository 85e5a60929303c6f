//! OAuth 1.0a request signing (HMAC-SHA1) and the out-of-band PIN exchange.
//!
//! The PIN flow only runs from the `auth-twitter` command: request token →
//! user authorizes in a browser and gets a PIN → PIN is traded for a
//! long-lived access token. Archive runs just sign with stored credentials.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::distributions::Alphanumeric;
use rand::Rng as _;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method};
use sha1::Sha1;
use url::Url;

use super::error::TwitterError;

type HmacSha1 = Hmac<Sha1>;

const REQUEST_TOKEN_URL: &str = "https://api.twitter.com/oauth/request_token";
const AUTHORIZE_URL: &str = "https://api.twitter.com/oauth/authorize";
const ACCESS_TOKEN_URL: &str = "https://api.twitter.com/oauth/access_token";

/// RFC 3986 unreserved characters pass through; everything else is encoded.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn encode(s: &str) -> String {
    utf8_percent_encode(s, OAUTH_ENCODE_SET).to_string()
}

/// A token/secret pair (request token or access token).
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    pub key: String,
    pub secret: String,
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Consumer credentials plus, once authorized, a user token.
#[derive(Clone)]
pub struct OAuthCredentials {
    consumer_key: String,
    consumer_secret: String,
    token: Option<Token>,
}

impl std::fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("token", &self.token)
            .finish()
    }
}

impl OAuthCredentials {
    pub fn consumer(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            consumer_key: key.into(),
            consumer_secret: secret.into(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }

    /// Build the `Authorization: OAuth ...` header value for one request.
    ///
    /// Query parameters of `url` are part of the signature; `extra` carries
    /// protocol parameters such as `oauth_callback` or `oauth_verifier`.
    pub fn authorization_header(&self, method: &Method, url: &Url, extra: &[(&str, &str)]) -> String {
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.header_with(method.as_str(), url, extra, &nonce, timestamp)
    }

    fn header_with(
        &self,
        method: &str,
        url: &Url,
        extra: &[(&str, &str)],
        nonce: &str,
        timestamp: u64,
    ) -> String {
        let mut params = self.oauth_params(extra, nonce, timestamp);
        let base = signature_base_string(method, url, &params);
        params.push(("oauth_signature".to_string(), self.sign(&base)));
        params.sort();

        let fields: Vec<String> = params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect();
        format!("OAuth {}", fields.join(", "))
    }

    fn oauth_params(&self, extra: &[(&str, &str)], nonce: &str, timestamp: u64) -> Vec<(String, String)> {
        let mut params = vec![
            ("oauth_consumer_key".to_string(), self.consumer_key.clone()),
            ("oauth_nonce".to_string(), nonce.to_string()),
            ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            ("oauth_version".to_string(), "1.0".to_string()),
        ];
        if let Some(token) = &self.token {
            params.push(("oauth_token".to_string(), token.key.clone()));
        }
        params.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        params
    }

    fn sign(&self, base: &str) -> String {
        let token_secret = self.token.as_ref().map(|t| t.secret.as_str()).unwrap_or("");
        let key = format!("{}&{}", encode(&self.consumer_secret), encode(token_secret));
        let Ok(mut mac) = HmacSha1::new_from_slice(key.as_bytes()) else {
            unreachable!("HMAC accepts keys of any length");
        };
        mac.update(base.as_bytes());
        base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes())
    }
}

/// `METHOD&encoded-base-url&encoded-sorted-params`.
fn signature_base_string(method: &str, url: &Url, oauth_params: &[(String, String)]) -> String {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (encode(&k), encode(&v)))
        .chain(oauth_params.iter().map(|(k, v)| (encode(k), encode(v))))
        .collect();
    pairs.sort();
    let normalized = pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut base_url = url.clone();
    base_url.set_query(None);
    base_url.set_fragment(None);

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        encode(base_url.as_str()),
        encode(&normalized)
    )
}

/// Token endpoint reply (`oauth_token=...&oauth_token_secret=...`).
#[derive(Debug)]
pub struct TokenResponse {
    pub token: Token,
    pub screen_name: Option<String>,
}

fn parse_token_response(body: &str) -> Result<TokenResponse, TwitterError> {
    let mut key = None;
    let mut secret = None;
    let mut screen_name = None;
    for (k, v) in url::form_urlencoded::parse(body.as_bytes()) {
        match k.as_ref() {
            "oauth_token" => key = Some(v.into_owned()),
            "oauth_token_secret" => secret = Some(v.into_owned()),
            "screen_name" => screen_name = Some(v.into_owned()),
            _ => {}
        }
    }
    match (key, secret) {
        (Some(key), Some(secret)) if !key.is_empty() => Ok(TokenResponse {
            token: Token { key, secret },
            screen_name,
        }),
        _ => Err(TwitterError::MalformedTokenResponse(body.to_string())),
    }
}

async fn post_signed(client: &Client, url: Url, header: String) -> Result<String, TwitterError> {
    let response = client
        .post(url)
        .header(AUTHORIZATION, header)
        .body("")
        .send()
        .await?;
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(TwitterError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

/// Step 1: obtain a temporary request token for the out-of-band flow.
pub async fn request_token(
    client: &Client,
    consumer: &OAuthCredentials,
) -> Result<Token, TwitterError> {
    let url = Url::parse(REQUEST_TOKEN_URL)?;
    let header = consumer.authorization_header(&Method::POST, &url, &[("oauth_callback", "oob")]);
    let body = post_signed(client, url, header).await?;
    Ok(parse_token_response(&body)?.token)
}

/// Step 2: the page where the user approves access and receives a PIN.
pub fn authorization_url(request_token: &Token) -> Result<Url, TwitterError> {
    Ok(Url::parse_with_params(
        AUTHORIZE_URL,
        &[("oauth_token", request_token.key.as_str())],
    )?)
}

/// Step 3: trade the request token and PIN for a long-lived access token.
pub async fn access_token(
    client: &Client,
    consumer: &OAuthCredentials,
    request_token: Token,
    pin: &str,
) -> Result<TokenResponse, TwitterError> {
    let url = Url::parse(ACCESS_TOKEN_URL)?;
    let signer = consumer.clone().with_token(request_token);
    let header = signer.authorization_header(&Method::POST, &url, &[("oauth_verifier", pin)]);
    let body = post_signed(client, url, header).await?;
    parse_token_response(&body)
}
