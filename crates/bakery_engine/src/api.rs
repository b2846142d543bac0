use bakery_logging::{bakery_debug, bakery_warn};
use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::wire::{
    Credentials, CustomerRecord, CustomerUpdate, IdBody, NewCustomer, NewOrder, OrderRecord,
    StatusUpdate, TokenResponse,
};
use crate::{FailureKind, RequestError};

pub const DEFAULT_BASE_URL: &str = "https://bolinho-backend.herokuapp.com";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub user_agent: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!("bakery-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// One operation per remote action. Each call is a single request: no
/// retries, no caching, no timeouts beyond what the transport reports.
#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, RequestError>;

    async fn list_customers(
        &self,
        token: Option<&str>,
    ) -> Result<Vec<CustomerRecord>, RequestError>;

    async fn get_customer(
        &self,
        id: u64,
        token: Option<&str>,
    ) -> Result<CustomerRecord, RequestError>;

    async fn create_customer(
        &self,
        customer: &NewCustomer,
        token: Option<&str>,
    ) -> Result<(), RequestError>;

    async fn update_customer(
        &self,
        customer: &CustomerUpdate,
        token: Option<&str>,
    ) -> Result<(), RequestError>;

    async fn delete_customer(&self, id: u64, token: Option<&str>) -> Result<(), RequestError>;

    async fn customer_orders(
        &self,
        id: u64,
        token: Option<&str>,
    ) -> Result<Vec<OrderRecord>, RequestError>;

    /// Number of orders of one customer, without reading the records.
    async fn count_customer_orders(
        &self,
        id: u64,
        token: Option<&str>,
    ) -> Result<usize, RequestError>;

    async fn list_orders(&self, token: Option<&str>) -> Result<Vec<OrderRecord>, RequestError>;

    async fn create_order(&self, order: &NewOrder, token: Option<&str>)
        -> Result<(), RequestError>;

    async fn update_order_status(
        &self,
        update: &StatusUpdate,
        token: Option<&str>,
    ) -> Result<(), RequestError>;

    async fn delete_order(&self, id: u64, token: Option<&str>) -> Result<(), RequestError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ReqwestApiClient {
    pub fn new(settings: ClientSettings) -> Result<Self, RequestError> {
        let parsed = url::Url::parse(settings.base_url.trim())
            .map_err(|err| RequestError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(RequestError::new(
                FailureKind::InvalidUrl,
                format!("not an http(s) base url: {parsed}"),
            ));
        }
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent)
            .build()
            .map_err(|err| RequestError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url, RequestError> {
        reqwest::Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|err| RequestError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        token: Option<&str>,
    ) -> Result<Vec<u8>, RequestError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let mut request = self.client.request(method.clone(), self.endpoint(path)?);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        bakery_debug!("{} {} -> {}", method, path, status);
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            let body: Option<Value> = serde_json::from_slice(&bytes).ok();
            let text = String::from_utf8_lossy(&bytes).trim().to_string();
            let message = if body.is_none() && !text.is_empty() {
                text
            } else {
                status.to_string()
            };
            return Err(RequestError {
                kind: FailureKind::HttpStatus(status.as_u16()),
                message,
                body,
            });
        }
        Ok(bytes.to_vec())
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<T, RequestError> {
        let bytes = self.send::<()>(Method::GET, path, None, token).await?;
        decode(&bytes)
    }

    async fn get_collection<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<Vec<T>, RequestError> {
        let bytes = self.send::<()>(Method::GET, path, None, token).await?;
        decode_collection(&bytes)
    }

    async fn mutate<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<(), RequestError> {
        self.send(method, path, Some(body), token).await.map(|_| ())
    }
}

#[async_trait::async_trait]
impl ApiClient for ReqwestApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, RequestError> {
        let bytes = self
            .send(Method::POST, "/login", Some(credentials), None)
            .await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(TokenResponse::default());
        }
        decode(&bytes)
    }

    async fn list_customers(
        &self,
        token: Option<&str>,
    ) -> Result<Vec<CustomerRecord>, RequestError> {
        self.get_collection("/clientes", token).await
    }

    async fn get_customer(
        &self,
        id: u64,
        token: Option<&str>,
    ) -> Result<CustomerRecord, RequestError> {
        self.get(&format!("/clientes/{id}"), token).await
    }

    async fn create_customer(
        &self,
        customer: &NewCustomer,
        token: Option<&str>,
    ) -> Result<(), RequestError> {
        self.mutate(Method::POST, "/clientes", customer, token).await
    }

    async fn update_customer(
        &self,
        customer: &CustomerUpdate,
        token: Option<&str>,
    ) -> Result<(), RequestError> {
        self.mutate(Method::PUT, "/clientes", customer, token).await
    }

    async fn delete_customer(&self, id: u64, token: Option<&str>) -> Result<(), RequestError> {
        self.mutate(Method::DELETE, "/clientes", &IdBody { id }, token)
            .await
    }

    async fn customer_orders(
        &self,
        id: u64,
        token: Option<&str>,
    ) -> Result<Vec<OrderRecord>, RequestError> {
        self.get_collection(&format!("/clientes/{id}/pedidos"), token)
            .await
    }

    async fn count_customer_orders(
        &self,
        id: u64,
        token: Option<&str>,
    ) -> Result<usize, RequestError> {
        let path = format!("/clientes/{id}/pedidos");
        let bytes = self.send::<()>(Method::GET, &path, None, token).await?;
        collection_items(&bytes).map(|items| items.len())
    }

    async fn list_orders(&self, token: Option<&str>) -> Result<Vec<OrderRecord>, RequestError> {
        self.get_collection("/pedidos", token).await
    }

    async fn create_order(
        &self,
        order: &NewOrder,
        token: Option<&str>,
    ) -> Result<(), RequestError> {
        self.mutate(Method::POST, "/pedidos", order, token).await
    }

    async fn update_order_status(
        &self,
        update: &StatusUpdate,
        token: Option<&str>,
    ) -> Result<(), RequestError> {
        self.mutate(Method::PUT, "/pedidos", update, token).await
    }

    async fn delete_order(&self, id: u64, token: Option<&str>) -> Result<(), RequestError> {
        self.mutate(Method::DELETE, "/pedidos", &IdBody { id }, token)
            .await
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, RequestError> {
    serde_json::from_slice(bytes)
        .map_err(|err| RequestError::new(FailureKind::Decode, err.to_string()))
}

/// Lists arrive either as an array or as an object keyed by id; object
/// values are taken in document order.
fn collection_items(bytes: &[u8]) -> Result<Vec<Value>, RequestError> {
    match decode::<Value>(bytes)? {
        Value::Array(items) => Ok(items),
        Value::Object(map) => Ok(map.into_iter().map(|(_, item)| item).collect()),
        other => Err(RequestError::new(
            FailureKind::Decode,
            format!("expected a list, got {other}"),
        )),
    }
}

/// Rows that cannot be read are logged and skipped; the rest are kept.
fn decode_collection<T: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>, RequestError> {
    let items = collection_items(bytes)?;
    let total = items.len();
    let rows: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(row) => Some(row),
            Err(err) => {
                bakery_warn!("Skipping unreadable row {} of {}: {}", index, total, err);
                None
            }
        })
        .collect();
    Ok(rows)
}

fn map_reqwest_error(err: reqwest::Error) -> RequestError {
    if err.is_builder() {
        return RequestError::new(FailureKind::InvalidUrl, err.to_string());
    }
    if err.is_decode() {
        return RequestError::new(FailureKind::Decode, err.to_string());
    }
    RequestError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::CakeSize;

    #[test]
    fn keyed_collections_keep_document_order() {
        let records: Vec<OrderRecord> = decode_collection(
            br#"{"b":{"id":2,"clienteid":1,"tamanho":"GRANDE"},"a":{"id":1,"clienteid":1}}"#,
        )
        .unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(records[0].size, CakeSize::Large);
    }

    #[test]
    fn one_unreadable_row_does_not_hide_the_others() {
        let records: Vec<CustomerRecord> = decode_collection(
            br#"[{"id":1,"nome":"Ana Souza","idade":30},{"id":2,"nome":"Rui Lima","idade":null},{"nome":"no id"}]"#,
        )
        .unwrap();
        let summary: Vec<_> = records.iter().map(|r| (r.id, r.age)).collect();
        assert_eq!(summary, vec![(1, 30), (2, 0)]);
    }

    #[test]
    fn scalar_body_is_not_a_list() {
        let err = decode_collection::<OrderRecord>(b"42").unwrap_err();
        assert_eq!(err.kind, FailureKind::Decode);
    }

    #[test]
    fn rejects_non_http_base_urls() {
        let settings = ClientSettings {
            base_url: "mailto:bakery@example.com".to_string(),
            ..ClientSettings::default()
        };
        assert_eq!(
            ReqwestApiClient::new(settings).unwrap_err().kind,
            FailureKind::InvalidUrl
        );
    }
}
