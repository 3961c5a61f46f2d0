// Copyright 2025 Adobe. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.
//
// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

//! Drift detection between an asset definition and a live table.
//!
//! Everything here is a pure function of the two inputs.

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::asset::{Asset, MaterializationType};
use crate::warehouse::TableMetadata;

/// Whether the live partitioning matches the asset's partition column.
///
/// Time and range partitioning are checked independently; if both are
/// present, both must name the declared column.
pub fn partitioning_matches(live: &TableMetadata, asset: &Asset) -> bool {
    let partition_by = asset.materialization.partition_column().unwrap_or("");

    if live.time_partitioning.is_none() && live.range_partitioning.is_none() {
        return partition_by.is_empty();
    }

    if let Some(time) = &live.time_partitioning {
        if time.field != partition_by {
            return false;
        }
    }
    if let Some(range) = &live.range_partitioning {
        if range.field != partition_by {
            return false;
        }
    }
    true
}

/// Whether the live clustering matches the asset's cluster columns.
/// Order is significant.
pub fn clustering_matches(live: &TableMetadata, asset: &Asset) -> bool {
    let declared = &asset.materialization.cluster_by;
    match &live.clustering {
        None => declared.is_empty(),
        Some(clustering) if clustering.fields.is_empty() => declared.is_empty(),
        Some(clustering) => clustering.fields == *declared,
    }
}

/// Whether the live object kind matches the declared materialization type.
///
/// An asset without a materialization type has no opinion and always matches.
pub fn materialization_type_matches(live: &TableMetadata, asset: &Asset) -> bool {
    match asset.materialization.materialization_type {
        MaterializationType::None => true,
        declared => live.table_type.eq_ignore_ascii_case(declared.as_str()),
    }
}

/// Whether partitioning and clustering need comparing at all.
///
/// Plain tables backing plain assets are skipped so they never drift on layout.
pub fn requires_mismatch_check(live: &TableMetadata, asset: &Asset) -> bool {
    live.has_layout() || asset.materialization.declares_layout()
}

/// Whether partitioning or clustering drifted.
pub fn layout_mismatch(live: &TableMetadata, asset: &Asset) -> bool {
    requires_mismatch_check(live, asset)
        && (!partitioning_matches(live, asset) || !clustering_matches(live, asset))
}

/// Which dimensions of a table drifted from its asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriftReport {
    pub materialization_type: bool,
    pub partitioning: bool,
    pub clustering: bool,
}

impl DriftReport {
    /// Compare a live table against an asset.
    ///
    /// Type drift is always evaluated. Layout drift is only evaluated when
    /// [`requires_mismatch_check`] holds.
    pub fn detect(live: &TableMetadata, asset: &Asset) -> Self {
        let check_layout = requires_mismatch_check(live, asset);
        Self {
            materialization_type: !materialization_type_matches(live, asset),
            partitioning: check_layout && !partitioning_matches(live, asset),
            clustering: check_layout && !clustering_matches(live, asset),
        }
    }

    pub fn has_drift(&self) -> bool {
        self.materialization_type || self.partitioning || self.clustering
    }
}

impl Display for DriftReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let drifted: Vec<&str> = [
            (self.materialization_type, "materialization type"),
            (self.partitioning, "partitioning"),
            (self.clustering, "clustering"),
        ]
        .iter()
        .filter(|(drifted, _)| *drifted)
        .map(|(_, name)| *name)
        .collect();

        if drifted.is_empty() {
            write!(f, "nothing")
        } else {
            write!(f, "{}", drifted.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warehouse::{Clustering, RangePartitioning, TimePartitioning};

    fn table(table_type: &str) -> TableMetadata {
        TableMetadata {
            table_type: table_type.to_string(),
            ..Default::default()
        }
    }

    fn time_partitioned(field: &str) -> TableMetadata {
        TableMetadata {
            time_partitioning: Some(TimePartitioning {
                field: field.to_string(),
            }),
            ..table("TABLE")
        }
    }

    fn clustered(fields: &[&str]) -> TableMetadata {
        TableMetadata {
            clustering: Some(Clustering {
                fields: fields.iter().map(|f| f.to_string()).collect(),
            }),
            ..table("TABLE")
        }
    }

    #[test]
    fn test_partitioning_same_time_field() {
        let asset = Asset::new("ds.t").with_partition_by("dt");
        assert!(partitioning_matches(&time_partitioned("dt"), &asset));
        assert!(!partitioning_matches(&time_partitioned("other"), &asset));
    }

    #[test]
    fn test_partitioning_unpartitioned_both_sides() {
        assert!(partitioning_matches(&table("TABLE"), &Asset::new("ds.t")));
    }

    #[test]
    fn test_partitioning_declared_but_live_unpartitioned() {
        let asset = Asset::new("ds.t").with_partition_by("dt");
        assert!(!partitioning_matches(&table("TABLE"), &asset));
    }

    #[test]
    fn test_partitioning_live_partitioned_but_undeclared() {
        assert!(!partitioning_matches(
            &time_partitioned("dt"),
            &Asset::new("ds.t")
        ));
    }

    #[test]
    fn test_partitioning_range_field() {
        let live = TableMetadata {
            range_partitioning: Some(RangePartitioning {
                field: "bucket".to_string(),
            }),
            ..table("TABLE")
        };
        assert!(partitioning_matches(
            &live,
            &Asset::new("ds.t").with_partition_by("bucket")
        ));
        assert!(!partitioning_matches(
            &live,
            &Asset::new("ds.t").with_partition_by("dt")
        ));
    }

    #[test]
    fn test_partitioning_both_kinds_must_agree() {
        let live = TableMetadata {
            range_partitioning: Some(RangePartitioning {
                field: "bucket".to_string(),
            }),
            ..time_partitioned("dt")
        };
        assert!(!partitioning_matches(
            &live,
            &Asset::new("ds.t").with_partition_by("dt")
        ));
    }

    #[test]
    fn test_clustering_same_order() {
        let asset = Asset::new("ds.t").with_cluster_by(["a", "b"]);
        assert!(clustering_matches(&clustered(&["a", "b"]), &asset));
    }

    #[test]
    fn test_clustering_is_order_sensitive() {
        let asset = Asset::new("ds.t").with_cluster_by(["a", "b"]);
        assert!(!clustering_matches(&clustered(&["b", "a"]), &asset));
    }

    #[test]
    fn test_clustering_declared_but_live_empty_or_absent() {
        let asset = Asset::new("ds.t").with_cluster_by(["a", "b"]);
        assert!(!clustering_matches(&clustered(&[]), &asset));
        assert!(!clustering_matches(&table("TABLE"), &asset));
    }

    #[test]
    fn test_clustering_length_mismatch() {
        let asset = Asset::new("ds.t").with_cluster_by(["a"]);
        assert!(!clustering_matches(&clustered(&["a", "b"]), &asset));
        assert!(!clustering_matches(&clustered(&["a"]), &Asset::new("ds.t")));
    }

    #[test]
    fn test_clustering_absent_and_undeclared() {
        assert!(clustering_matches(&table("TABLE"), &Asset::new("ds.t")));
    }

    #[test]
    fn test_materialization_type_case_insensitive() {
        let asset = Asset::new("ds.t").with_materialization_type(MaterializationType::Table);
        assert!(materialization_type_matches(&table("TABLE"), &asset));
        assert!(!materialization_type_matches(&table("VIEW"), &asset));
    }

    #[test]
    fn test_materialization_type_none_always_matches() {
        let asset = Asset::new("ds.t");
        for live in ["TABLE", "VIEW", "EXTERNAL", ""] {
            assert!(materialization_type_matches(&table(live), &asset));
        }
    }

    #[test]
    fn test_materialized_view_type() {
        let asset =
            Asset::new("ds.t").with_materialization_type(MaterializationType::MaterializedView);
        assert!(materialization_type_matches(&table("MATERIALIZED_VIEW"), &asset));
    }

    #[test]
    fn test_requires_mismatch_check() {
        assert!(!requires_mismatch_check(&table("TABLE"), &Asset::new("ds.t")));
        assert!(requires_mismatch_check(&time_partitioned("dt"), &Asset::new("ds.t")));
        assert!(requires_mismatch_check(&clustered(&["a"]), &Asset::new("ds.t")));
        assert!(requires_mismatch_check(
            &table("TABLE"),
            &Asset::new("ds.t").with_cluster_by(["a"])
        ));
    }

    #[test]
    fn test_drift_report_plain_table_has_no_drift() {
        let asset = Asset::new("ds.t").with_materialization_type(MaterializationType::Table);
        let report = DriftReport::detect(&table("TABLE"), &asset);
        assert!(!report.has_drift());
        assert_eq!(report.to_string(), "nothing");
    }

    #[test]
    fn test_drift_report_type_only_on_unpartitioned_table() {
        let asset = Asset::new("ds.t").with_materialization_type(MaterializationType::View);
        let report = DriftReport::detect(&table("TABLE"), &asset);
        assert_eq!(
            report,
            DriftReport {
                materialization_type: true,
                partitioning: false,
                clustering: false,
            }
        );
        assert_eq!(report.to_string(), "materialization type");
    }

    #[test]
    fn test_drift_report_layout_on_view() {
        let asset = Asset::new("ds.t")
            .with_materialization_type(MaterializationType::View)
            .with_partition_by("dt")
            .with_cluster_by(["a"]);
        let report = DriftReport::detect(&table("VIEW"), &asset);
        assert!(report.has_drift());
        assert!(!report.materialization_type);
        assert_eq!(report.to_string(), "partitioning, clustering");
        assert!(layout_mismatch(&table("VIEW"), &asset));
    }
}
