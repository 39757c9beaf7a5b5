//! Object store seam and the S3 client used against MinIO-compatible stores
use crate::config::StoreConfig;
use crate::error::StoreError;
use anyhow::{anyhow, Result};
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use regex::Regex;
use std::fmt::Debug;

const CREDENTIALS_PROVIDER: &str = "raster-probe";

pub async fn client_from_config(config: &StoreConfig) -> Client {
    let credentials = Credentials::new(
        &config.access_key,
        &config.secret_key,
        None,
        None,
        CREDENTIALS_PROVIDER,
    );

    let base_config = aws_config::defaults(BehaviorVersion::latest())
        .credentials_provider(credentials)
        .region(Region::new(config.region.clone()))
        .endpoint_url(config.endpoint_url())
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&base_config)
        .force_path_style(true)
        .build();

    Client::from_conf(s3_config)
}

/// Capability the fetcher needs from a remote store: the full body of a named object.
pub trait ObjectStore {
    async fn get_object(self: &Self, bucket: &str, key: &str) -> Result<ByteStream, StoreError>;
}

pub struct S3Store {
    client: Client,
}

impl S3Store {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn from_config(config: &StoreConfig) -> Self {
        Self::new(client_from_config(config).await)
    }
}

impl ObjectStore for S3Store {
    async fn get_object(self: &Self, bucket: &str, key: &str) -> Result<ByteStream, StoreError> {
        let object = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| classify_get_object_error(bucket, key, err))?;
        Ok(object.body)
    }
}

fn classify_get_object_error<R: Debug>(
    bucket: &str,
    key: &str,
    err: SdkError<GetObjectError, R>,
) -> StoreError {
    let not_found = || StoreError::NotFound {
        bucket: bucket.to_string(),
        key: key.to_string(),
    };
    match err.as_service_error() {
        Some(service) if service.is_no_such_key() => not_found(),
        Some(service) => match service.code() {
            Some("NoSuchBucket") | Some("NotFound") => not_found(),
            Some("AccessDenied") | Some("InvalidAccessKeyId") | Some("SignatureDoesNotMatch") => {
                StoreError::AccessDenied {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                }
            }
            _ => StoreError::Service(DisplayErrorContext(&err).to_string()),
        },
        None => StoreError::Transport(DisplayErrorContext(&err).to_string()),
    }
}

/// Bucket and key of a remote object, as given by an `s3://bucket/key` url.
#[derive(Debug, PartialEq)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

impl ObjectLocation {
    pub fn from_url(url: &str) -> Result<Self> {
        let re = Regex::new(r"^s3://(?<bucket>[\w.-]+)/(?<key>.+)$")?;

        let captures = re
            .captures(url)
            .ok_or(anyhow!("Not an s3://bucket/key url: {}", url))?;

        let (_, [bucket, key]) = captures.extract();

        Ok(Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }
}
