use std::{
    collections::HashMap,
    hash::{DefaultHasher, Hash, Hasher},
    path::{Path, PathBuf},
    time::Duration,
};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;

use crate::{
    error::{CutawayError, Result},
    types::Insertion,
};

pub const PEXELS_ENV_VAR: &str = "PEXELS_API_KEY";
pub const PIXABAY_ENV_VAR: &str = "PIXABAY_API_KEY";

const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(15);

/// Resolve a topical query to an image file on disk.
#[async_trait]
pub trait ResolveImage {
    async fn resolve(&mut self, query: &str) -> Result<PathBuf>;
}

/// Fetches B-roll stills from stock image providers, falling back to a
/// keyless placeholder source when no provider credential is configured or
/// both searches come up empty. Which source answered is invisible to the
/// caller. Results are cached by exact query string for the lifetime of
/// the resolver, one download per distinct query.
pub struct ImageResolver {
    client: reqwest::Client,
    images_dir: PathBuf,
    pexels_key: Option<String>,
    pixabay_key: Option<String>,
    cache: HashMap<String, PathBuf>,
    next_index: usize,
}

impl ImageResolver {
    pub fn new(images_dir: PathBuf) -> Self {
        Self {
            client: reqwest::Client::new(),
            images_dir,
            pexels_key: std::env::var(PEXELS_ENV_VAR).ok().filter(|k| !k.is_empty()),
            pixabay_key: std::env::var(PIXABAY_ENV_VAR).ok().filter(|k| !k.is_empty()),
            cache: HashMap::new(),
            next_index: 0,
        }
    }

    /// True when at least one stock provider credential is configured.
    pub fn has_credentials(&self) -> bool {
        self.pexels_key.is_some() || self.pixabay_key.is_some()
    }

    async fn search_pexels(&self, query: &str) -> Option<String> {
        let key = self.pexels_key.as_deref()?;
        let response = self
            .client
            .get("https://api.pexels.com/v1/search")
            .header("Authorization", key)
            .query(&[
                ("query", query),
                ("per_page", "1"),
                ("orientation", "landscape"),
            ])
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await
            .ok()?;

        let data: Value = response.json().await.ok()?;
        data["photos"][0]["src"]["large"].as_str().map(String::from)
    }

    async fn search_pixabay(&self, query: &str) -> Option<String> {
        let key = self.pixabay_key.as_deref()?;
        let response = self
            .client
            .get("https://pixabay.com/api/")
            .query(&[
                ("key", key),
                ("q", query),
                ("image_type", "photo"),
                ("orientation", "horizontal"),
                ("per_page", "3"),
            ])
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await
            .ok()?;

        let data: Value = response.json().await.ok()?;
        data["hits"][0]["largeImageURL"].as_str().map(String::from)
    }

    /// Keyless placeholder source, seeded so repeated queries stay stable.
    fn fallback_url(query: &str) -> String {
        let mut hasher = DefaultHasher::new();
        query.hash(&mut hasher);
        format!("https://picsum.photos/seed/{}/800/600", hasher.finish())
    }

    async fn download(&self, url: &str, dest: &Path, query: &str) -> Result<()> {
        let response = self
            .client
            .get(url)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| CutawayError::ImageFailed {
                query: query.to_string(),
                reason: e.to_string(),
            })?;

        let bytes = response.bytes().await?;
        fs::write(dest, &bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl ResolveImage for ImageResolver {
    async fn resolve(&mut self, query: &str) -> Result<PathBuf> {
        if let Some(path) = self.cache.get(query) {
            return Ok(path.clone());
        }

        if !self.images_dir.exists() {
            fs::create_dir_all(&self.images_dir).await?;
        }

        // Ordered provider fallback: Pexels, then Pixabay, then placeholder
        let mut url = self.search_pexels(query).await;
        if url.is_none() {
            url = self.search_pixabay(query).await;
        }
        let url = url.unwrap_or_else(|| Self::fallback_url(query));

        let dest = self
            .images_dir
            .join(format!("image_{:03}.jpg", self.next_index));
        self.download(&url, &dest, query).await?;
        self.next_index += 1;

        self.cache.insert(query.to_string(), dest.clone());
        Ok(dest)
    }
}

/// Outcome of materializing a plan: insertions with resolved imagery, plus
/// the ones dropped because resolution failed.
pub struct MaterializeReport {
    pub plan: Vec<Insertion>,
    pub dropped: Vec<(Insertion, CutawayError)>,
}

/// Resolve each planned insertion to an image on disk. One resolution
/// attempt per insertion; a failure drops that insertion and the rest of
/// the plan carries on.
pub async fn materialize_insertions<R: ResolveImage>(
    insertions: Vec<Insertion>,
    resolver: &mut R,
) -> MaterializeReport {
    let mut plan = Vec::with_capacity(insertions.len());
    let mut dropped = Vec::new();

    for mut insertion in insertions {
        match resolver.resolve(&insertion.keyword).await {
            Ok(path) => {
                insertion.image_path = Some(path);
                plan.push(insertion);
            }
            Err(err) => dropped.push((insertion, err)),
        }
    }

    MaterializeReport { plan, dropped }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubResolver {
        fail_on: Option<&'static str>,
        calls: Vec<String>,
    }

    impl StubResolver {
        fn new(fail_on: Option<&'static str>) -> Self {
            Self {
                fail_on,
                calls: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl ResolveImage for StubResolver {
        async fn resolve(&mut self, query: &str) -> Result<PathBuf> {
            self.calls.push(query.to_string());
            if self.fail_on == Some(query) {
                return Err(CutawayError::ImageFailed {
                    query: query.to_string(),
                    reason: "stubbed failure".to_string(),
                });
            }
            Ok(PathBuf::from(format!("/img/{}.jpg", query.replace(' ', "_"))))
        }
    }

    fn insertion(time: f64, keyword: &str) -> Insertion {
        Insertion {
            time,
            duration: 4.0,
            keyword: keyword.to_string(),
            context: String::new(),
            image_path: None,
        }
    }

    #[tokio::test]
    async fn single_failure_drops_one_insertion_and_keeps_the_rest() {
        let insertions = vec![
            insertion(2.0, "water"),
            insertion(9.0, "doctor"),
            insertion(15.0, "kidney"),
        ];
        let mut resolver = StubResolver::new(Some("doctor"));

        let report = materialize_insertions(insertions, &mut resolver).await;

        assert_eq!(report.plan.len(), 2);
        assert_eq!(report.dropped.len(), 1);
        assert_eq!(report.dropped[0].0.keyword, "doctor");
        assert_eq!(report.plan[0].time, 2.0);
        assert_eq!(report.plan[1].time, 15.0);
        for ins in &report.plan {
            assert!(ins.image_path.is_some());
        }
    }

    #[tokio::test]
    async fn each_insertion_gets_exactly_one_resolution_attempt() {
        let insertions = vec![insertion(2.0, "water"), insertion(9.0, "water")];
        let mut resolver = StubResolver::new(None);

        materialize_insertions(insertions, &mut resolver).await;

        assert_eq!(resolver.calls, vec!["water", "water"]);
    }

    #[tokio::test]
    async fn resolver_serves_repeated_queries_from_cache() {
        let mut resolver = ImageResolver::new(PathBuf::from("/nonexistent"));
        resolver
            .cache
            .insert("water".to_string(), PathBuf::from("/img/water.jpg"));

        // cache hit short-circuits before any directory or network access
        let path = resolver.resolve("water").await.unwrap();
        assert_eq!(path, PathBuf::from("/img/water.jpg"));
    }

    #[test]
    fn fallback_url_is_stable_per_query() {
        assert_eq!(
            ImageResolver::fallback_url("health exercise"),
            ImageResolver::fallback_url("health exercise")
        );
        assert_ne!(
            ImageResolver::fallback_url("health exercise"),
            ImageResolver::fallback_url("doctor")
        );
    }
}
