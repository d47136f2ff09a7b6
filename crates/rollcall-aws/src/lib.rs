//! rollcall-aws: S3, Rekognition and DynamoDB behind the rollcall-core traits.

pub mod dynamodb;
pub mod provision;
pub mod rekognition;
pub mod s3;

use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use rollcall_core::{AttendancePipeline, AttendanceRecorder, FaceMatcher, Settings};

pub use dynamodb::DynamoRecordTable;
pub use provision::{ensure_table, ProvisionError, ProvisionOutcome};
pub use rekognition::RekognitionComparator;
pub use s3::S3ObjectStore;

/// The attendance pipeline wired to the AWS adapters.
pub type AwsPipeline = AttendancePipeline<S3ObjectStore, RekognitionComparator, DynamoRecordTable>;

/// SDK clients for every service the kiosk touches.
#[derive(Clone)]
pub struct AwsServices {
    pub s3: S3ObjectStore,
    pub rekognition: RekognitionComparator,
    pub dynamodb: DynamoRecordTable,
    /// Raw DynamoDB client for table provisioning.
    pub dynamodb_client: aws_sdk_dynamodb::Client,
}

impl AwsServices {
    /// Load SDK configuration for the configured region and build clients.
    ///
    /// Static credentials from the settings take precedence over the SDK's
    /// default provider chain.
    pub async fn connect(settings: &Settings) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(settings.region.clone()));

        if let Some(creds) = &settings.credentials {
            loader = loader.credentials_provider(Credentials::new(
                &creds.access_key_id,
                &creds.secret_access_key,
                None,
                None,
                "rollcall-env",
            ));
        }

        let sdk_config = loader.load().await;
        let dynamodb_client = aws_sdk_dynamodb::Client::new(&sdk_config);

        tracing::info!(
            region = %settings.region,
            bucket = %settings.bucket,
            table = %settings.table_name,
            static_credentials = settings.credentials.is_some(),
            "AWS clients initialized"
        );

        Self {
            s3: S3ObjectStore::new(aws_sdk_s3::Client::new(&sdk_config)),
            rekognition: RekognitionComparator::new(aws_sdk_rekognition::Client::new(&sdk_config)),
            dynamodb: DynamoRecordTable::new(dynamodb_client.clone()),
            dynamodb_client,
        }
    }

    /// Build the upload → match → record pipeline from the settings.
    pub fn pipeline(&self, settings: &Settings) -> AwsPipeline {
        AttendancePipeline::new(
            self.s3.clone(),
            FaceMatcher::new(
                self.s3.clone(),
                self.rekognition.clone(),
                settings.known_folder.clone(),
                settings.similarity_threshold,
            ),
            AttendanceRecorder::new(
                self.dynamodb.clone(),
                settings.table_name.clone(),
                settings.department.clone(),
                settings.year_passout.clone(),
            ),
            settings.bucket.clone(),
            settings.unknown_folder.clone(),
        )
    }
}
