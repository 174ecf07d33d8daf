use crate::record::RouteRecord;
use std::collections::HashMap;

/// Collapses records that share an identity key into one record per key.
///
/// Descriptive fields come from the first record seen for a key,
/// `distance_km` is the longest distance in the group and `daily_km` is
/// the total across the group. Groups keep the order in which their key
/// first appeared.
pub fn merge_routes(records: Vec<RouteRecord>) -> Vec<RouteRecord> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<RouteRecord>> = Vec::new();

    for record in records {
        let key = record.identity_key();
        match index.get(&key) {
            Some(&i) => groups[i].push(record),
            None => {
                index.insert(key, groups.len());
                groups.push(vec![record]);
            }
        }
    }

    groups.into_iter().filter_map(merge_group).collect()
}

fn merge_group(group: Vec<RouteRecord>) -> Option<RouteRecord> {
    let mut rows = group.into_iter();
    let first = rows.next()?;

    Some(rows.fold(first, |mut acc, row| {
        acc.distance_km = acc.distance_km.max(row.distance_km);
        acc.daily_km += row.daily_km;
        acc
    }))
}
