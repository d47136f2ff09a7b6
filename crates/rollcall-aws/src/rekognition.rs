use aws_sdk_rekognition::error::DisplayErrorContext;
use aws_sdk_rekognition::types::{Image, S3Object};
use aws_sdk_rekognition::Client;
use rollcall_core::{FaceComparator, FaceMatch, ServiceError};
use tracing::instrument;

/// Rekognition `CompareFaces` over images already stored in S3.
#[derive(Clone)]
pub struct RekognitionComparator {
    client: Client,
}

impl RekognitionComparator {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn s3_image(bucket: &str, key: &str) -> Image {
    Image::builder()
        .s3_object(S3Object::builder().bucket(bucket).name(key).build())
        .build()
}

impl FaceComparator for RekognitionComparator {
    #[instrument(skip(self))]
    async fn compare_faces(
        &self,
        bucket: &str,
        source_key: &str,
        target_key: &str,
        threshold: f32,
    ) -> Result<Vec<FaceMatch>, ServiceError> {
        let response = self
            .client
            .compare_faces()
            .source_image(s3_image(bucket, source_key))
            .target_image(s3_image(bucket, target_key))
            .similarity_threshold(threshold)
            .send()
            .await
            .map_err(|e| ServiceError::CompareFaces {
                source_key: source_key.to_string(),
                target_key: target_key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        let matches: Vec<FaceMatch> = response
            .face_matches()
            .iter()
            .map(|m| FaceMatch {
                similarity: m.similarity(),
            })
            .collect();

        tracing::debug!(
            matches = matches.len(),
            unmatched = response.unmatched_faces().len(),
            "compare_faces"
        );
        Ok(matches)
    }
}
