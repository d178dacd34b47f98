use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    BucketLocationConstraint, CreateBucketConfiguration, Delete, ObjectIdentifier,
};
use aws_sdk_s3::Client;
use chrono::DateTime;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::models::config::ConsoleConfig;
use crate::models::list::{ListingPage, ObjectEntry};
use crate::operations::backend::{Backend, PackageRequest, ProgressCallback};

/// S3 implementation of the [`Backend`] trait.
#[derive(Clone)]
pub struct S3Backend {
    client: Client,
    sts: aws_sdk_sts::Client,
    region: String,
    endpoint_url: Option<String>,
    path_style: bool,
}

impl S3Backend {
    pub async fn connect(console: &ConsoleConfig) -> Result<Self> {
        let region_str = console.region.clone();

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(region_str.clone()));
        if let Some(profile) = &console.profile {
            loader = loader.profile_name(profile);
        }
        let mut config = loader.load().await;

        // Chain through multiple roles if configured
        for (index, role) in console.role_chain.iter().enumerate() {
            let sts_client = aws_sdk_sts::Client::new(&config);

            let assumed_role = sts_client
                .assume_role()
                .role_arn(role)
                .role_session_name(format!(
                    "s3b-chain-{}-{}",
                    index,
                    chrono::Utc::now().timestamp()
                ))
                .send()
                .await
                .context(format!(
                    "Failed to assume role (step {} of {}): {role}",
                    index + 1,
                    console.role_chain.len()
                ))?;

            if let Some(creds) = assumed_role.credentials() {
                use aws_credential_types::Credentials;
                use std::time::SystemTime;

                let expiration = SystemTime::try_from(*creds.expiration()).ok();

                let credentials = Credentials::new(
                    creds.access_key_id(),
                    creds.secret_access_key(),
                    Some(creds.session_token().to_string()),
                    expiration,
                    "AssumedRole",
                );

                config = aws_config::defaults(BehaviorVersion::latest())
                    .credentials_provider(credentials)
                    .region(aws_config::Region::new(region_str.clone()))
                    .load()
                    .await;
            }
        }

        let mut s3_config_builder = aws_sdk_s3::config::Builder::from(&config);

        if let Some(endpoint) = &console.endpoint_url {
            s3_config_builder = s3_config_builder.endpoint_url(endpoint);
        }

        if console.path_style {
            s3_config_builder = s3_config_builder.force_path_style(true);
        }

        let client = Client::from_conf(s3_config_builder.build());
        let sts = aws_sdk_sts::Client::new(&config);

        debug!(region = %region_str, "connected storage backend");

        Ok(Self {
            client,
            sts,
            region: region_str,
            endpoint_url: console.endpoint_url.clone(),
            path_style: console.path_style,
        })
    }

    /// Public (unsigned) URL for an object, for anonymous share links.
    fn public_url(&self, bucket: &str, object: &str) -> String {
        match &self.endpoint_url {
            Some(endpoint) => {
                let endpoint = endpoint.trim_end_matches('/');
                format!("{endpoint}/{bucket}/{object}")
            }
            None if self.path_style => {
                let region = &self.region;
                format!("https://s3.{region}.amazonaws.com/{bucket}/{object}")
            }
            None => {
                let region = &self.region;
                format!("https://{bucket}.s3.{region}.amazonaws.com/{object}")
            }
        }
    }

    /// All object keys below `prefix`, following continuation tokens.
    async fn collect_object_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let mut req = self.client.list_objects_v2().bucket(bucket).prefix(prefix);
            if let Some(token) = continuation.take() {
                req = req.continuation_token(token);
            }
            let resp = req
                .send()
                .await
                .context("Failed to enumerate package contents")?;

            for obj in resp.contents() {
                if let Some(key) = obj.key() {
                    if !key.ends_with('/') {
                        keys.push(key.to_string());
                    }
                }
            }

            if resp.is_truncated().unwrap_or(false) {
                continuation = resp.next_continuation_token().map(str::to_string);
            } else {
                break;
            }
        }

        Ok(keys)
    }

    async fn download_key(
        &self,
        bucket: &str,
        key: &str,
        local_path: &Path,
        transferred: &mut u64,
        progress: Option<&ProgressCallback>,
    ) -> Result<()> {
        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .context("Failed to get object")?;

        if let Some(parent) = local_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = File::create(local_path).await?;
        let mut stream = resp.body;

        while let Some(bytes) = stream.try_next().await? {
            file.write_all(&bytes).await?;
            *transferred += bytes.len() as u64;

            if let Some(callback) = progress {
                let mut cb = callback.lock().await;
                cb(*transferred);
            }
        }

        file.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl Backend for S3Backend {
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        continuation: Option<String>,
    ) -> Result<ListingPage> {
        let mut req = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .delimiter("/");
        if let Some(token) = continuation {
            req = req.continuation_token(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to list objects in bucket '{bucket}': {e:?}"))?;

        let mut entries = Vec::new();

        for cp in resp.common_prefixes() {
            if let Some(prefix_str) = cp.prefix() {
                let name = prefix_str.strip_prefix(prefix).unwrap_or(prefix_str);
                entries.push(ObjectEntry::directory(name));
            }
        }

        for obj in resp.contents() {
            if let Some(key) = obj.key() {
                if key != prefix && !key.ends_with('/') {
                    let name = key.strip_prefix(prefix).unwrap_or(key);
                    entries.push(ObjectEntry::file(
                        name,
                        obj.size().unwrap_or(0),
                        obj.last_modified()
                            .map(|t| DateTime::from_timestamp(t.secs(), 0).unwrap_or_default()),
                    ));
                }
            }
        }

        Ok(ListingPage {
            entries,
            continuation_token: resp.next_continuation_token().map(str::to_string),
            truncated: resp.is_truncated().unwrap_or(false),
        })
    }

    async fn list_buckets(&self) -> Result<Vec<String>> {
        let resp = self
            .client
            .list_buckets()
            .send()
            .await
            .context("Failed to list buckets")?;

        Ok(resp
            .buckets()
            .iter()
            .filter_map(|b| b.name().map(str::to_string))
            .collect())
    }

    async fn make_bucket(&self, name: &str) -> Result<()> {
        let constraint = BucketLocationConstraint::from(self.region.as_str());
        let configuration = CreateBucketConfiguration::builder()
            .location_constraint(constraint)
            .build();

        self.client
            .create_bucket()
            .bucket(name)
            .create_bucket_configuration(configuration)
            .send()
            .await
            .context(format!("Failed to create bucket '{name}'"))?;

        Ok(())
    }

    async fn remove_objects(&self, bucket: &str, objects: &[String]) -> Result<()> {
        let mut identifiers = Vec::with_capacity(objects.len());
        for key in objects {
            identifiers.push(
                ObjectIdentifier::builder()
                    .key(key)
                    .build()
                    .context(format!("Invalid object key '{key}'"))?,
            );
        }

        let delete = Delete::builder()
            .set_objects(Some(identifiers))
            .quiet(true)
            .build()
            .context("Failed to build delete request")?;

        let resp = self
            .client
            .delete_objects()
            .bucket(bucket)
            .delete(delete)
            .send()
            .await
            .context("Failed to delete objects")?;

        let errors = resp.errors();
        if !errors.is_empty() {
            let count = errors.len();
            bail!("Failed to delete {count} object(s)");
        }

        Ok(())
    }

    async fn create_access_token(&self) -> Result<String> {
        let resp = self
            .sts
            .get_session_token()
            .duration_seconds(3600)
            .send()
            .await
            .context("Failed to create access token")?;

        resp.credentials()
            .map(|c| c.session_token().to_string())
            .context("Access token response carried no credentials")
    }

    async fn share_link(
        &self,
        bucket: &str,
        object: &str,
        expiry: Option<Duration>,
    ) -> Result<String> {
        let Some(expiry) = expiry else {
            return Ok(self.public_url(bucket, object));
        };

        let presigning = PresigningConfig::expires_in(expiry).context("Invalid share link expiry")?;

        let presigned = self
            .client
            .get_object()
            .bucket(bucket)
            .key(object)
            .presigned(presigning)
            .await
            .context("Failed to presign share link")?;

        Ok(presigned.uri().to_string())
    }

    async fn upload_file(
        &self,
        bucket: &str,
        key: &str,
        local_path: &Path,
        progress: Option<ProgressCallback>,
    ) -> Result<()> {
        let file_size = tokio::fs::metadata(local_path)
            .await
            .context("Failed to get file metadata")?
            .len();

        if let Some(ref callback) = progress {
            let mut cb = callback.lock().await;
            cb(0);
        }

        let body = ByteStream::from_path(local_path)
            .await
            .context("Failed to read local file")?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .context("Failed to upload object")?;

        if let Some(ref callback) = progress {
            let mut cb = callback.lock().await;
            cb(file_size);
        }

        Ok(())
    }

    async fn packaged_download(
        &self,
        request: PackageRequest,
        dest_dir: &Path,
        progress: Option<ProgressCallback>,
    ) -> Result<()> {
        // Expand directory selections into their contained object keys.
        let mut keys = Vec::new();
        for name in &request.objects {
            let full = format!("{}{}", request.prefix, name);
            if name.ends_with('/') {
                keys.extend(self.collect_object_keys(&request.bucket, &full).await?);
            } else {
                keys.push(full);
            }
        }

        debug!(count = keys.len(), bucket = %request.bucket, "starting packaged download");

        let mut transferred = 0u64;
        for key in &keys {
            let relative = key.strip_prefix(&request.prefix).unwrap_or(key);
            let local_path = dest_dir.join(relative);
            self.download_key(
                &request.bucket,
                key,
                &local_path,
                &mut transferred,
                progress.as_ref(),
            )
            .await?;
        }

        Ok(())
    }
}
