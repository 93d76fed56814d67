//! Fold the flat outlet set into the district -> region -> outlets tree.

use std::collections::BTreeMap;

use crate::models::{District, DistrictNode, Outlet, RegionNode, RegionTree, UNKNOWN_REGION};

/// Build the region tree from a store scan.
///
/// Districts are ordered North, South and regions by name; outlets keep their
/// scan order. Outlets in [`UNKNOWN_REGION`] are left out of the tree, but a
/// district bucket is still created for them. Pure: the tree is rebuilt on
/// every read.
pub fn build<I>(outlets: I) -> RegionTree
where
    I: IntoIterator<Item = Outlet>,
{
    let mut buckets: BTreeMap<District, BTreeMap<String, Vec<Outlet>>> = BTreeMap::new();

    for outlet in outlets {
        let regions = buckets.entry(outlet.district).or_default();

        if outlet.admin_region == UNKNOWN_REGION {
            continue;
        }

        regions
            .entry(outlet.admin_region.clone())
            .or_default()
            .push(outlet);
    }

    let districts = buckets
        .into_iter()
        .map(|(district, regions)| DistrictNode {
            id: district.bucket_id().to_string(),
            name: district.label().to_string(),
            district,
            regions: regions
                .into_iter()
                .map(|(name, outlets)| RegionNode {
                    id: name.clone(),
                    name,
                    outlets,
                })
                .collect(),
        })
        .collect();

    RegionTree { districts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinate;
    use chrono::Utc;

    fn outlet(name: &str, district: District, region: &str) -> Outlet {
        Outlet {
            id: format!("outlet-{}", name),
            name: name.to_string(),
            address: "Somewhere".to_string(),
            phone: None,
            outlet_type: "Mainstream".to_string(),
            coordinate: Coordinate::new(6.5, 0.0),
            district,
            admin_region: region.to_string(),
            ingested_at: Utc::now(),
            products: Vec::new(),
        }
    }

    #[test]
    fn test_empty() {
        let tree = build(Vec::new());
        assert!(tree.is_empty());
        assert_eq!(tree.outlet_count(), 0);
    }

    #[test]
    fn test_groups_by_district_then_region() {
        let tree = build(vec![
            outlet("a", District::South, "Greater Accra"),
            outlet("b", District::North, "Northern"),
            outlet("c", District::South, "Eastern"),
            outlet("d", District::South, "Greater Accra"),
        ]);

        assert_eq!(tree.districts.len(), 2);
        assert_eq!(tree.districts[0].id, "region-north");
        assert_eq!(tree.districts[0].name, "District North");

        let south = tree.district(District::South).unwrap();
        let names: Vec<&str> = south.regions.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Eastern", "Greater Accra"]);

        let accra = south.region("Greater Accra").unwrap();
        let outlets: Vec<&str> = accra.outlets.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(outlets, vec!["a", "d"]);
        assert_eq!(tree.outlet_count(), 4);
    }

    #[test]
    fn test_unknown_region_excluded() {
        let tree = build(vec![
            outlet("a", District::North, UNKNOWN_REGION),
            outlet("b", District::South, "Eastern"),
            outlet("c", District::South, UNKNOWN_REGION),
        ]);

        let north = tree.district(District::North).unwrap();
        assert!(north.regions.is_empty());

        let south = tree.district(District::South).unwrap();
        assert_eq!(south.regions.len(), 1);
        assert!(south.region(UNKNOWN_REGION).is_none());
        assert_eq!(tree.outlet_count(), 1);
    }
}
