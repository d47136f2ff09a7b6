//! Sequential face matching against the reference folder.
//!
//! References are compared one at a time in listing order and the first one
//! the comparison service reports any match for wins. There is no ranking by
//! similarity, so the result depends on listing order when several
//! references would qualify.

use crate::gateway::ObjectGateway;
use crate::service::{FaceComparator, ObjectStore};
use crate::types::reference_name;

/// Default minimum similarity, in percent.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 85.0;

pub struct FaceMatcher<S, C> {
    gateway: ObjectGateway<S>,
    comparator: C,
    known_folder: String,
    threshold: f32,
}

impl<S: ObjectStore, C: FaceComparator> FaceMatcher<S, C> {
    pub fn new(store: S, comparator: C, known_folder: impl Into<String>, threshold: f32) -> Self {
        Self {
            gateway: ObjectGateway::new(store),
            comparator,
            known_folder: known_folder.into(),
            threshold,
        }
    }

    /// Name of the first reference whose face matches the candidate image.
    ///
    /// Listing and comparison errors end the scan and are treated as no match.
    pub async fn find_match(&self, bucket: &str, candidate_key: &str) -> Option<String> {
        let references = match self.gateway.list(bucket, &self.known_folder).await {
            Ok(keys) => keys,
            Err(e) => {
                tracing::error!(error = %e, "failed to list reference images");
                return None;
            }
        };

        let placeholder = format!("{}/", self.known_folder.trim_end_matches('/'));

        for reference in references
            .iter()
            .filter(|k| !k.ends_with('/') && **k != placeholder)
        {
            let matches = match self
                .comparator
                .compare_faces(bucket, reference, candidate_key, self.threshold)
                .await
            {
                Ok(m) => m,
                Err(e) => {
                    tracing::error!(error = %e, reference = %reference, "face comparison failed");
                    return None;
                }
            };

            if let Some(best) = matches.first() {
                let Some(name) = reference_name(reference) else {
                    tracing::warn!(reference = %reference, "matched reference has no usable name");
                    return None;
                };
                tracing::info!(
                    name = %name,
                    reference = %reference,
                    similarity = ?best.similarity,
                    "face matched"
                );
                return Some(name);
            }
        }

        tracing::warn!(candidate = candidate_key, "no matching faces found");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeCloud;

    fn matcher(cloud: &FakeCloud) -> FaceMatcher<&FakeCloud, &FakeCloud> {
        FaceMatcher::new(cloud, cloud, "known_faces", DEFAULT_SIMILARITY_THRESHOLD)
    }

    #[tokio::test]
    async fn test_match_returns_reference_name() {
        let cloud = FakeCloud::with_references(&[
            "known_faces/alice.jpg",
            "known_faces/bob.png",
        ])
        .matching("known_faces/bob.png");

        let name = matcher(&cloud).find_match("bucket", "unknown/tmp1.jpg").await;
        assert_eq!(name.as_deref(), Some("bob"));
    }

    #[tokio::test]
    async fn test_no_match_returns_none() {
        let cloud = FakeCloud::with_references(&["known_faces/alice.jpg", "known_faces/bob.png"]);
        let name = matcher(&cloud).find_match("bucket", "unknown/tmp1.jpg").await;
        assert!(name.is_none());
        assert_eq!(cloud.compared.borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_first_listed_match_wins() {
        let cloud = FakeCloud::with_references(&[
            "known_faces/carol.jpg",
            "known_faces/alice.jpg",
            "known_faces/bob.jpg",
        ])
        .matching("known_faces/alice.jpg")
        .matching("known_faces/bob.jpg");

        let name = matcher(&cloud).find_match("bucket", "unknown/tmp1.jpg").await;
        assert_eq!(name.as_deref(), Some("alice"));

        // bob is never evaluated
        let compared: Vec<String> = cloud.compared.borrow().iter().map(|(s, _, _)| s.clone()).collect();
        assert_eq!(compared, vec!["known_faces/carol.jpg", "known_faces/alice.jpg"]);
    }

    #[tokio::test]
    async fn test_placeholders_are_skipped() {
        let cloud = FakeCloud::with_references(&[
            "known_faces/",
            "known_faces/archive/",
            "known_faces/dave.jpeg",
        ])
        .matching("known_faces/dave.jpeg");

        let name = matcher(&cloud).find_match("bucket", "unknown/tmp1.jpg").await;
        assert_eq!(name.as_deref(), Some("dave"));
        assert_eq!(cloud.compared.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_candidate_is_comparison_target() {
        let cloud = FakeCloud::with_references(&["known_faces/alice.jpg"]).matching("known_faces/alice.jpg");
        matcher(&cloud).find_match("bucket", "unknown/tmp9.jpg").await;
        assert_eq!(
            cloud.compared.borrow()[0],
            (
                "known_faces/alice.jpg".to_string(),
                "unknown/tmp9.jpg".to_string(),
                DEFAULT_SIMILARITY_THRESHOLD
            )
        );
    }

    #[tokio::test]
    async fn test_comparison_error_aborts_scan() {
        let mut cloud = FakeCloud::with_references(&[
            "known_faces/alice.jpg",
            "known_faces/bob.jpg",
        ])
        .matching("known_faces/bob.jpg");
        cloud.failing = Some("known_faces/alice.jpg".into());

        let name = matcher(&cloud).find_match("bucket", "unknown/tmp1.jpg").await;
        assert!(name.is_none());
        assert_eq!(cloud.compared.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_listing_error_is_no_match() {
        let cloud = FakeCloud {
            fail_list: true,
            ..FakeCloud::with_references(&["known_faces/alice.jpg"]).matching("known_faces/alice.jpg")
        };
        let name = matcher(&cloud).find_match("bucket", "unknown/tmp1.jpg").await;
        assert!(name.is_none());
        assert!(cloud.compared.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_unnamed_match_ends_scan() {
        let cloud = FakeCloud::with_references(&["known_faces/.jpg", "known_faces/bob.jpg"])
            .matching("known_faces/.jpg")
            .matching("known_faces/bob.jpg");

        let name = matcher(&cloud).find_match("bucket", "unknown/tmp1.jpg").await;
        assert!(name.is_none());
        assert_eq!(cloud.compared.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_configured_threshold_reaches_comparator() {
        let cloud = FakeCloud::with_references(&["known_faces/alice.jpg", "known_faces/bob.jpg"]);
        FaceMatcher::new(&cloud, &cloud, "known_faces", 92.5)
            .find_match("bucket", "unknown/tmp1.jpg")
            .await;

        let thresholds: Vec<f32> = cloud.compared.borrow().iter().map(|(_, _, t)| *t).collect();
        assert_eq!(thresholds, vec![92.5, 92.5]);
    }
}
