use crate::matcher::DEFAULT_SIMILARITY_THRESHOLD;

/// Runtime settings shared by the kiosk and the CLI, loaded from the
/// environment (and a `.env` file when present).
#[derive(Debug, Clone)]
pub struct Settings {
    /// AWS region for S3, Rekognition and DynamoDB.
    pub region: String,
    /// Static credentials; `None` falls back to the SDK's default chain.
    pub credentials: Option<StaticCredentials>,
    pub bucket: String,
    /// Folder holding pre-enrolled reference images.
    pub known_folder: String,
    /// Folder receiving captured candidate images.
    pub unknown_folder: String,
    pub table_name: String,
    /// Minimum similarity in percent for a face match.
    pub similarity_threshold: f32,
    pub department: String,
    pub year_passout: String,
    pub admin_password: String,
    /// V4L2 device path for the kiosk camera.
    pub camera_device: String,
}

#[derive(Clone)]
pub struct StaticCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

impl Settings {
    /// Load `.env` (if any) and read settings from the process environment.
    pub fn from_env() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "ignoring unreadable .env"),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let credentials = match (lookup("AWS_ACCESS_KEY_ID"), lookup("AWS_SECRET_ACCESS_KEY")) {
            (Some(access_key_id), Some(secret_access_key))
                if !access_key_id.is_empty() && !secret_access_key.is_empty() =>
            {
                Some(StaticCredentials {
                    access_key_id,
                    secret_access_key,
                })
            }
            _ => None,
        };

        Self {
            region: var("AWS_REGION", "us-east-1"),
            credentials,
            bucket: var("S3_BUCKET", "known-faces-of-students-2025"),
            known_folder: var("KNOWN_FOLDER", "known_faces"),
            unknown_folder: var("UNKNOWN_FOLDER", "unknown"),
            table_name: var("DYNAMO_TABLE_NAME", "AttendanceTable"),
            similarity_threshold: threshold(lookup("ROLLCALL_SIMILARITY_THRESHOLD")),
            department: var("ROLLCALL_DEPARTMENT", "CSE - AIML"),
            year_passout: var("ROLLCALL_YEAR_PASSOUT", "2022-2026"),
            admin_password: var("ROLLCALL_ADMIN_PASSWORD", "admin@2025"),
            camera_device: var("ROLLCALL_CAMERA_DEVICE", "/dev/video0"),
        }
    }
}

fn threshold(raw: Option<String>) -> f32 {
    let Some(raw) = raw.filter(|v| !v.is_empty()) else {
        return DEFAULT_SIMILARITY_THRESHOLD;
    };
    match raw.parse::<f32>() {
        Ok(t) if (0.0..=100.0).contains(&t) => t,
        _ => {
            tracing::warn!(
                value = %raw,
                default = DEFAULT_SIMILARITY_THRESHOLD,
                "ROLLCALL_SIMILARITY_THRESHOLD must be a percentage in 0..=100, using default"
            );
            DEFAULT_SIMILARITY_THRESHOLD
        }
    }
}
