//! Reduction of classified markers into one summary per cycle

use super::{Marker, MarkerKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Coarse zone groups used for teammate counts.
///
/// `aliases` is a fixed table of fine-grained zone names that roll up into a
/// bucket. It is not derived from the zone catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingBuckets {
    pub buckets: Vec<String>,
    pub aliases: Vec<(String, String)>,
}

impl ReportingBuckets {
    pub fn new<B, S>(buckets: B) -> Self
    where
        B: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            buckets: buckets.into_iter().map(Into::into).collect(),
            aliases: Vec::new(),
        }
    }

    pub fn with_alias(mut self, zone: impl Into<String>, bucket: impl Into<String>) -> Self {
        self.aliases.push((zone.into(), bucket.into()));
        self
    }

    /// Bucket a resolved zone name counts towards, if any.
    pub fn bucket_for<'a>(&'a self, zone: &str) -> Option<&'a str> {
        if let Some(bucket) = self.buckets.iter().find(|b| b.as_str() == zone) {
            return Some(bucket.as_str());
        }
        self.aliases
            .iter()
            .find(|(alias, _)| alias == zone)
            .map(|(_, bucket)| bucket.as_str())
    }
}

impl Default for ReportingBuckets {
    fn default() -> Self {
        Self::new(["A平台", "A大", "A小", "B点", "B通", "沙地"])
            .with_alias("A小楼梯", "A小")
            .with_alias("A小中路", "A小")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCount {
    pub bucket: String,
    pub count: u32,
}

/// Output of one cycle; the only value handed to the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSummary {
    /// Teammate counts, in bucket order
    pub team_counts: Vec<BucketCount>,
    pub enemy_zones: BTreeSet<String>,
    pub object_zones: BTreeSet<String>,
}

impl FrameSummary {
    /// All buckets present with zero counts and both zone sets empty.
    pub fn empty(buckets: &ReportingBuckets) -> Self {
        Self {
            team_counts: buckets
                .buckets
                .iter()
                .map(|bucket| BucketCount {
                    bucket: bucket.clone(),
                    count: 0,
                })
                .collect(),
            ..Default::default()
        }
    }

    pub fn count(&self, bucket: &str) -> u32 {
        self.team_counts
            .iter()
            .find(|c| c.bucket == bucket)
            .map_or(0, |c| c.count)
    }

    pub fn total_teammates(&self) -> u32 {
        self.team_counts.iter().map(|c| c.count).sum()
    }

    pub fn enemy_text(&self) -> String {
        join(&self.enemy_zones)
    }

    pub fn object_text(&self) -> String {
        join(&self.object_zones)
    }

    pub fn is_quiet(&self) -> bool {
        self.total_teammates() == 0 && self.enemy_zones.is_empty() && self.object_zones.is_empty()
    }
}

fn join(zones: &BTreeSet<String>) -> String {
    zones.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}

/// Tally classified markers into a summary.
///
/// Markers without a resolved zone contribute nothing. Teammates in zones that
/// map to no bucket are ignored.
pub fn aggregate(markers: &[Marker], buckets: &ReportingBuckets) -> FrameSummary {
    let mut summary = FrameSummary::empty(buckets);

    for marker in markers {
        let Some(zone) = marker.zone.as_deref() else {
            continue;
        };

        match marker.kind {
            MarkerKind::Teammate => {
                if let Some(bucket) = buckets.bucket_for(zone) {
                    if let Some(slot) = summary.team_counts.iter_mut().find(|c| c.bucket == bucket) {
                        slot.count += 1;
                    }
                }
            }
            MarkerKind::Enemy => {
                summary.enemy_zones.insert(zone.to_string());
            }
            MarkerKind::DetectedObject => {
                summary.object_zones.insert(zone.to_string());
            }
        }
    }

    summary
}
