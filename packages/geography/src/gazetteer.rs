//! In-memory gazetteer for place-mention resolution.
//!
//! Built once from the administrative-unit tables at startup, the way the
//! boundary indexes are built for point-in-polygon attribution: load rows,
//! index by normalized name, serve lookups without further database
//! round-trips.

use std::collections::BTreeMap;

use flood_map_geography_models::{
    Coordinate, District, LocationPrecision, ResolvedLocation, State, Town,
};
use switchy_database::Database;

use crate::normalize::normalize;
use crate::{GeoError, queries};

/// In-memory index over states, districts, and towns.
///
/// Name keys are normalized; towns and districts may share a name across
/// states, so name buckets hold every match and a state hint narrows them.
pub struct Gazetteer {
    states: Vec<State>,
    districts: Vec<District>,
    towns: Vec<Town>,
    state_by_name: BTreeMap<String, usize>,
    district_by_name: BTreeMap<String, Vec<usize>>,
    town_by_name: BTreeMap<String, Vec<usize>>,
}

impl Gazetteer {
    /// Loads the gazetteer from the administrative-unit tables.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] if any of the queries fail.
    pub async fn load(db: &dyn Database) -> Result<Self, GeoError> {
        let states = queries::all_states(db).await?;
        let districts = queries::all_districts(db).await?;
        let towns = queries::all_towns(db).await?;

        log::info!(
            "Loaded gazetteer: {} states, {} districts, {} towns",
            states.len(),
            districts.len(),
            towns.len()
        );

        Ok(Self::from_parts(states, districts, towns))
    }

    /// Builds the gazetteer from already-loaded rows.
    #[must_use]
    pub fn from_parts(states: Vec<State>, districts: Vec<District>, towns: Vec<Town>) -> Self {
        let mut state_by_name = BTreeMap::new();
        for (idx, state) in states.iter().enumerate() {
            state_by_name.insert(normalize(&state.name), idx);
        }

        let mut district_by_name: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (idx, district) in districts.iter().enumerate() {
            district_by_name
                .entry(normalize(&district.name))
                .or_default()
                .push(idx);
        }

        let mut town_by_name: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (idx, town) in towns.iter().enumerate() {
            town_by_name
                .entry(normalize(&town.name))
                .or_default()
                .push(idx);
        }

        Self {
            states,
            districts,
            towns,
            state_by_name,
            district_by_name,
            town_by_name,
        }
    }

    /// Resolves a free-text place mention to a coordinate.
    ///
    /// Tries, in order: a town matching `city_text` (narrowed by
    /// `state_text` when it names a known state), a district matching
    /// `city_text` resolved to its towns' centroid, and finally the state
    /// centroid for `state_text`. Returns `None` when nothing matches —
    /// unresolved is not an error, callers exclude the report from the
    /// hazard index.
    #[must_use]
    pub fn resolve(
        &self,
        state_text: Option<&str>,
        city_text: Option<&str>,
    ) -> Option<ResolvedLocation> {
        let state_idx = state_text
            .map(normalize)
            .filter(|key| !key.is_empty())
            .and_then(|key| self.state_by_name.get(&key).copied());

        let city_key = city_text.map(normalize).filter(|key| !key.is_empty());

        if let Some(key) = &city_key {
            if let Some(resolved) = self.resolve_town(key, state_idx) {
                return Some(resolved);
            }
            if let Some(resolved) = self.resolve_district(key, state_idx) {
                return Some(resolved);
            }
        }

        self.resolve_state_centroid(state_idx)
    }

    /// Finds a town by normalized name, preferring the hinted state.
    fn resolve_town(&self, city_key: &str, state_idx: Option<usize>) -> Option<ResolvedLocation> {
        let bucket = self.town_by_name.get(city_key)?;
        let state_id = state_idx.map(|idx| self.states[idx].id.as_str());

        let located = |idx: &&usize| {
            let town = &self.towns[**idx];
            town.latitude.is_some() && town.longitude.is_some()
        };

        // Prefer a town inside the hinted state; fall back to the first
        // located match so a bare city mention still resolves.
        let town_idx = bucket
            .iter()
            .filter(located)
            .find(|idx| {
                state_id.is_some_and(|sid| self.towns[**idx].state_id.as_deref() == Some(sid))
            })
            .or_else(|| bucket.iter().find(located))?;

        let town = &self.towns[*town_idx];
        let (Some(latitude), Some(longitude)) = (town.latitude, town.longitude) else {
            return None;
        };

        Some(ResolvedLocation {
            coordinate: Coordinate::new(latitude, longitude),
            precision: LocationPrecision::Town,
            town_id: Some(town.id.clone()),
            district_id: town.district_id.clone(),
            state_id: town.state_id.clone(),
        })
    }

    /// Finds a district by normalized name and resolves its towns'
    /// centroid.
    fn resolve_district(
        &self,
        city_key: &str,
        state_idx: Option<usize>,
    ) -> Option<ResolvedLocation> {
        let bucket = self.district_by_name.get(city_key)?;
        let state_id = state_idx.map(|idx| self.states[idx].id.as_str());

        let district_idx = bucket
            .iter()
            .find(|idx| state_id.is_some_and(|sid| self.districts[**idx].state_id == sid))
            .or_else(|| bucket.first())?;

        let district = &self.districts[*district_idx];
        let centroid = self.centroid(|town| town.district_id.as_deref() == Some(&district.id))?;

        Some(ResolvedLocation {
            coordinate: centroid,
            precision: LocationPrecision::District,
            town_id: None,
            district_id: Some(district.id.clone()),
            state_id: Some(district.state_id.clone()),
        })
    }

    /// Resolves the hinted state to the centroid of its towns.
    fn resolve_state_centroid(&self, state_idx: Option<usize>) -> Option<ResolvedLocation> {
        let state = &self.states[state_idx?];
        let centroid = self.centroid(|town| town.state_id.as_deref() == Some(&state.id))?;

        Some(ResolvedLocation {
            coordinate: centroid,
            precision: LocationPrecision::StateCentroid,
            town_id: None,
            district_id: None,
            state_id: Some(state.id.clone()),
        })
    }

    /// Mean coordinate of the located towns accepted by `filter`.
    fn centroid(&self, filter: impl Fn(&Town) -> bool) -> Option<Coordinate> {
        let mut count = 0_u32;
        let mut lat_sum = 0.0;
        let mut lng_sum = 0.0;

        for town in &self.towns {
            if !filter(town) {
                continue;
            }
            let (Some(latitude), Some(longitude)) = (town.latitude, town.longitude) else {
                continue;
            };
            count += 1;
            lat_sum += latitude;
            lng_sum += longitude;
        }

        if count == 0 {
            return None;
        }

        Some(Coordinate::new(
            lat_sum / f64::from(count),
            lng_sum / f64::from(count),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn town(id: &str, name: &str, lat: f64, lng: f64, state: &str, district: &str) -> Town {
        Town {
            id: id.to_string(),
            name: name.to_string(),
            latitude: Some(lat),
            longitude: Some(lng),
            state_id: Some(state.to_string()),
            district_id: Some(district.to_string()),
        }
    }

    fn fixture() -> Gazetteer {
        let states = vec![
            State {
                id: "st-sel".to_string(),
                name: "Selangor".to_string(),
            },
            State {
                id: "st-png".to_string(),
                name: "Penang".to_string(),
            },
        ];
        let districts = vec![
            District {
                id: "d-pet".to_string(),
                name: "Petaling".to_string(),
                state_id: "st-sel".to_string(),
            },
            District {
                id: "d-klg".to_string(),
                name: "Klang".to_string(),
                state_id: "st-sel".to_string(),
            },
        ];
        let towns = vec![
            town("t-sa", "Shah Alam", 3.0733, 101.5185, "st-sel", "d-pet"),
            town("t-pj", "Petaling Jaya", 3.1073, 101.6067, "st-sel", "d-pet"),
            town("t-klg", "Klang", 3.0449, 101.4455, "st-sel", "d-klg"),
            // Same name in a different state.
            town("t-bay", "Bayan Lepas", 5.2945, 100.2593, "st-png", "d-klg"),
            // Town without surveyed coordinates.
            Town {
                id: "t-nc".to_string(),
                name: "Ulu Tiram".to_string(),
                latitude: None,
                longitude: None,
                state_id: Some("st-sel".to_string()),
                district_id: None,
            },
        ];
        Gazetteer::from_parts(states, districts, towns)
    }

    #[test]
    fn resolves_town_case_insensitively() {
        let gazetteer = fixture();
        let resolved = gazetteer.resolve(None, Some("shah  alam")).unwrap();
        assert_eq!(resolved.precision, LocationPrecision::Town);
        assert_eq!(resolved.town_id.as_deref(), Some("t-sa"));
        assert_eq!(resolved.district_id.as_deref(), Some("d-pet"));
        assert!((resolved.coordinate.latitude - 3.0733).abs() < 1e-9);
    }

    #[test]
    fn town_match_wins_over_district_match() {
        // "Klang" names both a town and a district; the town wins.
        let gazetteer = fixture();
        let resolved = gazetteer.resolve(Some("Selangor"), Some("Klang")).unwrap();
        assert_eq!(resolved.precision, LocationPrecision::Town);
        assert_eq!(resolved.town_id.as_deref(), Some("t-klg"));
    }

    #[test]
    fn falls_back_to_district_centroid() {
        let gazetteer = fixture();
        let resolved = gazetteer.resolve(Some("Selangor"), Some("Petaling")).unwrap();
        assert_eq!(resolved.precision, LocationPrecision::District);
        assert_eq!(resolved.district_id.as_deref(), Some("d-pet"));
        let expected_lat = f64::midpoint(3.0733, 3.1073);
        assert!((resolved.coordinate.latitude - expected_lat).abs() < 1e-9);
    }

    #[test]
    fn falls_back_to_state_centroid_for_unknown_city() {
        let gazetteer = fixture();
        let resolved = gazetteer
            .resolve(Some("Selangor"), Some("Nowhere Ville"))
            .unwrap();
        assert_eq!(resolved.precision, LocationPrecision::StateCentroid);
        assert_eq!(resolved.state_id.as_deref(), Some("st-sel"));
        let expected_lat = (3.0733 + 3.1073 + 3.0449) / 3.0;
        assert!((resolved.coordinate.latitude - expected_lat).abs() < 1e-9);
    }

    #[test]
    fn unresolved_for_unknown_everything() {
        let gazetteer = fixture();
        assert!(gazetteer.resolve(Some("Atlantis"), Some("Nowhere")).is_none());
    }

    #[test]
    fn unresolved_for_empty_input() {
        let gazetteer = fixture();
        assert!(gazetteer.resolve(None, None).is_none());
        assert!(gazetteer.resolve(Some("   "), Some("")).is_none());
    }

    #[test]
    fn town_without_coordinates_is_skipped() {
        let gazetteer = fixture();
        // Falls through town match to the state centroid.
        let resolved = gazetteer.resolve(Some("Selangor"), Some("Ulu Tiram")).unwrap();
        assert_eq!(resolved.precision, LocationPrecision::StateCentroid);
    }
}
