/// Bucket that BindCraft results are published to by default
pub const DEFAULT_BUCKET: &str = "atelasbio";
/// Public host of the object store
pub const DEFAULT_STORAGE_HOST: &str = "storage.googleapis.com";

const RESULTS_PREFIX: &str = "results";
const SUMMARY_FILE_NAME: &str = "summary.html";

/// Where run artifacts live in the object store.
///
/// Every object of a run is stored under `results/<design_path>/` in [BucketLayout::bucket] and
/// is publicly readable from `https://<host>/<bucket>/<key>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketLayout {
    pub host: String,
    pub bucket: String,
}

impl Default for BucketLayout {
    fn default() -> Self {
        Self {
            host: DEFAULT_STORAGE_HOST.to_string(),
            bucket: DEFAULT_BUCKET.to_string(),
        }
    }
}

impl BucketLayout {
    pub fn new(host: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            bucket: bucket.into(),
        }
    }

    /// Object key of `relative` within the results of a run.
    ///
    /// Empty segments are skipped so that an empty design path does not produce `//`.
    pub fn results_key(&self, design_path: &str, relative: &str) -> String {
        [RESULTS_PREFIX, design_path, relative]
            .into_iter()
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Object key of the summary page of a run
    pub fn summary_key(&self, design_path: &str) -> String {
        self.results_key(design_path, SUMMARY_FILE_NAME)
    }

    /// Public download URL of an object
    pub fn public_url(&self, key: &str) -> String {
        format!("https://{}/{}/{key}", self.host, self.bucket)
    }

    /// `gs://` URI of an object
    pub fn gs_uri(&self, key: &str) -> String {
        format!("gs://{}/{key}", self.bucket)
    }

    /// Public URL of the structure of an accepted design
    pub fn accepted_pdb_url(&self, design_path: &str, design_name: &str) -> String {
        self.public_url(&self.results_key(design_path, &format!("Accepted/{design_name}.pdb")))
    }

    /// Public URL of the trajectory animation of an accepted design
    pub fn animation_url(&self, design_path: &str, design_name: &str) -> String {
        self.public_url(&self.results_key(
            design_path,
            &format!("Accepted/Animation/{design_name}.html"),
        ))
    }
}
