use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use rollcall_core::{ObjectStore, ServiceError};
use tracing::{debug, instrument};

/// S3-backed [`ObjectStore`].
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ObjectStore for S3ObjectStore {
    #[instrument(skip(self, data), fields(size = data.len()))]
    async fn put_object(&self, bucket: &str, key: &str, data: Vec<u8>) -> Result<(), ServiceError> {
        let mut request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data));

        if let Some(ct) = content_type_for(key) {
            request = request.content_type(ct);
        }

        request.send().await.map_err(|e| ServiceError::PutObject {
            key: key.to_string(),
            message: DisplayErrorContext(&e).to_string(),
        })?;

        debug!("put s3://{}/{}", bucket, key);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, ServiceError> {
        let mut keys = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let response = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .prefix(prefix)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| ServiceError::ListObjects {
                    prefix: prefix.to_string(),
                    message: DisplayErrorContext(&e).to_string(),
                })?;

            keys.extend(
                response
                    .contents()
                    .iter()
                    .filter_map(|o| o.key().map(str::to_string)),
            );

            match response.next_continuation_token() {
                Some(token) if response.is_truncated().unwrap_or(false) => {
                    continuation = Some(token.to_string());
                }
                _ => break,
            }
        }

        debug!("listed {} objects under s3://{}/{}", keys.len(), bucket, prefix);
        Ok(keys)
    }
}

fn content_type_for(key: &str) -> Option<&'static str> {
    let ext = key.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("unknown/tmp1.jpg"), Some("image/jpeg"));
        assert_eq!(content_type_for("unknown/tmp1.JPEG"), Some("image/jpeg"));
        assert_eq!(content_type_for("known_faces/alice.png"), Some("image/png"));
        assert_eq!(content_type_for("unknown/raw"), None);
    }
}
