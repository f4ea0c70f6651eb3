use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};

use crate::{
    client::RecordStore,
    config::StoreConfig,
    error::{Operation, StoreError},
    filter::Filter,
    quickbase::auth::{TemporaryAuthorization, APP_TOKEN_HEADER, REALM_HEADER, TEMP_TOKEN_SCHEME},
    records::{
        DeleteRequest, DeleteResponse, FileDownload, QueryRequest, QueryResponse, Record,
        StoreErrorBody, WriteRequest, WriteResponse,
    },
    schema::Collection,
};

/// Record store client for a Quickbase realm
pub struct QuickbaseClient {
    config: StoreConfig,
    http_client: reqwest::Client,
}

impl QuickbaseClient {
    /// Create a new client for the given realm configuration
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        config.validate()?;

        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| StoreError::Network { source: e })?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Set a custom base URL for the API
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn table_id(&self, collection: Collection) -> &str {
        self.config.tables.id(collection)
    }

    /// Exchange the app token for a temporary token scoped to one table.
    /// Called fresh before every record operation; a failure aborts the
    /// operation rather than retrying.
    async fn temporary_token(&self, table_id: &str) -> Result<String, StoreError> {
        let url = format!("{}/auth/temporary/{}", self.config.base_url, table_id);

        let mut headers = self.realm_headers()?;
        headers.insert(
            APP_TOKEN_HEADER,
            HeaderValue::from_str(&self.config.app_token)
                .map_err(|_| StoreError::auth("Invalid app token format"))?,
        );

        let response = self
            .http_client
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| StoreError::Network { source: e })?;

        let status = response.status();
        if !status.is_success() {
            let message = read_error_message(response).await;
            return Err(StoreError::auth(format!(
                "token exchange for {} failed (status {}): {}",
                table_id,
                status.as_u16(),
                message
            )));
        }

        let authorization: TemporaryAuthorization = response
            .json()
            .await
            .map_err(|e| StoreError::auth(format!("Failed to parse token response: {}", e)))?;
        Ok(authorization.temporary_authorization)
    }

    fn realm_headers(&self) -> Result<HeaderMap, StoreError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            REALM_HEADER,
            HeaderValue::from_str(&self.config.realm_hostname)
                .map_err(|_| StoreError::config("Invalid realm hostname"))?,
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.config.user_agent)
                .map_err(|_| StoreError::config("Invalid user agent"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn record_headers(&self, token: &str) -> Result<HeaderMap, StoreError> {
        let mut headers = self.realm_headers()?;
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("{} {}", TEMP_TOKEN_SCHEME, token))
                .map_err(|_| StoreError::auth("Invalid temporary token format"))?,
        );
        Ok(headers)
    }

    async fn fail(
        &self,
        collection: Collection,
        operation: Operation,
        response: reqwest::Response,
    ) -> StoreError {
        let status = response.status();
        let message = read_error_message(response).await;

        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                StoreError::auth(message)
            }
            _ => StoreError::remote(collection.name(), operation, status.as_u16(), message),
        }
    }
}

/// Pull the store's error message out of a response body, falling back
/// to the raw text when the body is not the standard error shape.
async fn read_error_message(response: reqwest::Response) -> String {
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    match serde_json::from_str::<StoreErrorBody>(&text) {
        Ok(body) => body.description.unwrap_or(body.message),
        Err(_) => text,
    }
}

#[async_trait]
impl RecordStore for QuickbaseClient {
    async fn query(
        &self,
        collection: Collection,
        select: &[u32],
        filter: &Filter,
    ) -> Result<Vec<Record>, StoreError> {
        let table_id = self.table_id(collection).to_string();
        let token = self.temporary_token(&table_id).await?;
        let url = format!("{}/records/query", self.config.base_url);

        let request = QueryRequest {
            from: table_id,
            select: select.to_vec(),
            where_clause: (!filter.is_empty()).then(|| filter.to_query()),
            options: None,
        };
        tracing::debug!(collection = collection.name(), %filter, "querying records");

        let response = self
            .http_client
            .post(&url)
            .headers(self.record_headers(&token)?)
            .json(&request)
            .send()
            .await
            .map_err(|e| StoreError::Network { source: e })?;

        if !response.status().is_success() {
            return Err(self.fail(collection, Operation::Query, response).await);
        }

        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Network { source: e })?;

        if let Some(metadata) = &body.metadata {
            if let (Some(total), Some(returned)) = (metadata.total_records, metadata.num_records) {
                if returned < total {
                    return Err(StoreError::Incomplete {
                        collection: collection.name().to_string(),
                        returned,
                        total,
                    });
                }
            }
        }

        Ok(body.data)
    }

    async fn create_returning(
        &self,
        collection: Collection,
        rows: Vec<Record>,
        fields_to_return: &[u32],
    ) -> Result<WriteResponse, StoreError> {
        if rows.is_empty() {
            return Err(StoreError::invalid("create requires at least one row"));
        }

        let table_id = self.table_id(collection).to_string();
        let token = self.temporary_token(&table_id).await?;
        let url = format!("{}/records", self.config.base_url);

        let request = WriteRequest {
            to: table_id,
            data: rows,
            fields_to_return: (!fields_to_return.is_empty()).then(|| fields_to_return.to_vec()),
        };
        tracing::debug!(
            collection = collection.name(),
            rows = request.data.len(),
            "creating records"
        );

        let response = self
            .http_client
            .post(&url)
            .headers(self.record_headers(&token)?)
            .json(&request)
            .send()
            .await
            .map_err(|e| StoreError::Network { source: e })?;

        if !response.status().is_success() {
            return Err(self.fail(collection, Operation::Create, response).await);
        }

        response
            .json()
            .await
            .map_err(|e| StoreError::Network { source: e })
    }

    async fn update(&self, collection: Collection, rows: Vec<Record>) -> Result<(), StoreError> {
        if rows.is_empty() {
            return Err(StoreError::invalid("update requires at least one row"));
        }

        let table_id = self.table_id(collection).to_string();
        let token = self.temporary_token(&table_id).await?;
        let url = format!("{}/records", self.config.base_url);

        let request = WriteRequest {
            to: table_id,
            data: rows,
            fields_to_return: None,
        };
        tracing::debug!(
            collection = collection.name(),
            rows = request.data.len(),
            "updating records"
        );

        let response = self
            .http_client
            .post(&url)
            .headers(self.record_headers(&token)?)
            .json(&request)
            .send()
            .await
            .map_err(|e| StoreError::Network { source: e })?;

        if !response.status().is_success() {
            return Err(self.fail(collection, Operation::Update, response).await);
        }

        // Upsert metadata is not interesting to callers; drain the body
        let _: WriteResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Network { source: e })?;
        Ok(())
    }

    async fn delete(&self, collection: Collection, filter: &Filter) -> Result<u32, StoreError> {
        // An empty where-clause would match the whole table
        if filter.is_empty() {
            return Err(StoreError::invalid("delete requires a non-empty filter"));
        }

        let table_id = self.table_id(collection).to_string();
        let token = self.temporary_token(&table_id).await?;
        let url = format!("{}/records", self.config.base_url);

        let request = DeleteRequest {
            from: table_id,
            where_clause: filter.to_query(),
        };
        tracing::debug!(collection = collection.name(), %filter, "deleting records");

        let response = self
            .http_client
            .delete(&url)
            .headers(self.record_headers(&token)?)
            .json(&request)
            .send()
            .await
            .map_err(|e| StoreError::Network { source: e })?;

        if !response.status().is_success() {
            return Err(self.fail(collection, Operation::Delete, response).await);
        }

        let body: DeleteResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Network { source: e })?;
        Ok(body.number_deleted)
    }

    async fn download(
        &self,
        collection: Collection,
        path: &str,
    ) -> Result<FileDownload, StoreError> {
        let table_id = self.table_id(collection).to_string();
        let token = self.temporary_token(&table_id).await?;
        let url = format!("{}{}", self.config.base_url, path);

        let response = self
            .http_client
            .get(&url)
            .headers(self.record_headers(&token)?)
            .send()
            .await
            .map_err(|e| StoreError::Network { source: e })?;

        if !response.status().is_success() {
            return Err(self.fail(collection, Operation::Download, response).await);
        }

        let file_name = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.split("filename=").nth(1))
            .map(|name| name.trim_matches('"').to_string())
            .unwrap_or_else(|| "downloaded_file".to_string());

        // Body is the transport (base64) encoding of the file
        let content = response
            .text()
            .await
            .map_err(|e| StoreError::upload(format!("Failed to read file body: {}", e)))?;

        Ok(FileDownload { file_name, content })
    }
}
