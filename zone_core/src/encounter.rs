//! Weighted random selection of mutants, anomalies and weather.

use zone_rules::{AnomalyKind, Catalog, MutantDef, RandomSource, WeatherKind, Zone};

/// Extra weight stalking gives to rarer mutants.
pub const STALK_BONUS: f64 = 2.0;

/// Pick one candidate with probability proportional to its weight.
///
/// Draws `r = next * total` and returns the first candidate whose cumulative
/// weight reaches `r`, falling back to the first candidate if rounding leaves
/// nothing selected. Returns `None` only for an empty slice. Negative weights
/// count as zero.
pub fn select_weighted<'a, T>(
    candidates: &'a [T],
    weight: impl Fn(&T) -> f64,
    rng: &mut dyn RandomSource,
) -> Option<&'a T> {
    let first = candidates.first()?;
    let weights: Vec<f64> = candidates.iter().map(|c| weight(c).max(0.0)).collect();
    let total: f64 = weights.iter().sum();
    let roll = rng.next_f64() * total;

    let mut cumulative = 0.0;
    for (candidate, w) in candidates.iter().zip(&weights) {
        cumulative += w;
        if cumulative >= roll {
            return Some(candidate);
        }
    }
    Some(first)
}

/// Encounter weight of a mutant: common mutants turn up more often, and
/// stalking tilts the odds toward rarer prey.
pub fn mutant_weight(mutant: &MutantDef, stalking: bool) -> f64 {
    let bonus = if stalking { STALK_BONUS } else { 0.0 };
    (10.0 - f64::from(mutant.rarity) + bonus).max(0.0)
}

/// Pick a mutant roaming `zone`.
pub fn select_mutant<'a>(
    catalog: &'a Catalog,
    zone: &Zone,
    stalking: bool,
    rng: &mut dyn RandomSource,
) -> Option<&'a MutantDef> {
    let candidates = catalog.mutants_in_zone(zone);
    select_weighted(&candidates, |m| mutant_weight(m, stalking), rng).copied()
}

/// Pick any mutant roaming `zone`, ignoring rarity.
///
/// When nothing roams `zone`, any mutant in the catalog may turn up.
pub fn select_mutant_uniform<'a>(
    catalog: &'a Catalog,
    zone: &Zone,
    rng: &mut dyn RandomSource,
) -> Option<&'a MutantDef> {
    let mut candidates = catalog.mutants_in_zone(zone);
    if candidates.is_empty() {
        candidates = catalog.mutants().collect();
    }
    select_weighted(&candidates, |_| 1.0, rng).copied()
}

/// Pick an anomaly kind biased by the zone's terrain.
pub fn select_anomaly_kind(zone: &Zone, rng: &mut dyn RandomSource) -> AnomalyKind {
    let pool = AnomalyKind::for_zone_type(&zone.zone_type);
    select_weighted(pool, |_| 1.0, rng)
        .copied()
        .unwrap_or(AnomalyKind::Thermal)
}

/// Roll the next weather.
pub fn select_weather(rng: &mut dyn RandomSource) -> WeatherKind {
    select_weighted(&WeatherKind::ALL, |w| w.profile().chance, rng)
        .copied()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use zone_rules::{FixedRandom, ScriptedRandom};

    #[test]
    fn test_empty_is_none() {
        let mut rng = FixedRandom::new(0.5);
        let empty: [u32; 0] = [];
        assert!(select_weighted(&empty, |_| 1.0, &mut rng).is_none());
    }

    #[test]
    fn test_cumulative_walk() {
        let items = ["a", "b", "c"];
        let weights = |s: &&str| match *s {
            "a" => 1.0,
            "b" => 2.0,
            _ => 1.0,
        };
        // total 4: a covers [0,1], b (1,3], c (3,4]
        let mut rng = ScriptedRandom::new(vec![0.0, 0.25, 0.5, 0.74, 0.76]);
        assert_eq!(select_weighted(&items, weights, &mut rng), Some(&"a"));
        assert_eq!(select_weighted(&items, weights, &mut rng), Some(&"a"));
        assert_eq!(select_weighted(&items, weights, &mut rng), Some(&"b"));
        assert_eq!(select_weighted(&items, weights, &mut rng), Some(&"b"));
        assert_eq!(select_weighted(&items, weights, &mut rng), Some(&"c"));
    }

    #[test]
    fn test_zero_total_falls_back_to_first_candidate() {
        let items = [1, 2, 3];
        let mut rng = FixedRandom::new(0.9);
        assert_eq!(select_weighted(&items, |_| 0.0, &mut rng), Some(&1));
    }

    #[test]
    fn test_mutant_weight() {
        let common = MutantDef::new("dog", "Blind Dog", "dog", 40).with_rarity(1);
        let rare = MutantDef::new("chimera", "Chimera", "chimera", 300).with_rarity(9);
        assert_eq!(mutant_weight(&common, false), 9.0);
        assert_eq!(mutant_weight(&rare, false), 1.0);
        assert_eq!(mutant_weight(&rare, true), 3.0);
        let legendary = MutantDef::new("x", "X", "x", 10).with_rarity(15);
        assert_eq!(mutant_weight(&legendary, false), 0.0);
    }

    #[test]
    fn test_uniform_ignores_rarity() {
        let mut catalog = Catalog::new();
        catalog
            .add_mutant(MutantDef::new("dog", "Blind Dog", "dog", 40).with_rarity(1).in_zones(["Cordon"]))
            .unwrap();
        catalog
            .add_mutant(MutantDef::new("chimera", "Chimera", "chimera", 300).with_rarity(9).in_zones(["Cordon"]))
            .unwrap();
        let cordon = Zone::new("cordon", "Cordon");
        // Two candidates, even split at 0.5: chimera sorts first.
        let mut rng = FixedRandom::new(0.49);
        assert_eq!(select_mutant_uniform(&catalog, &cordon, &mut rng).map(|m| m.name.as_str()), Some("Chimera"));
        let mut rng = FixedRandom::new(0.51);
        assert_eq!(select_mutant_uniform(&catalog, &cordon, &mut rng).map(|m| m.name.as_str()), Some("Blind Dog"));

        let empty = Zone::new("pripyat", "Pripyat");
        assert!(select_mutant(&catalog, &empty, false, &mut rng).is_none());
        assert!(select_mutant_uniform(&catalog, &empty, &mut rng).is_some());
        assert!(select_mutant_uniform(&Catalog::new(), &empty, &mut rng).is_none());
    }

    #[test]
    fn test_anomaly_pool_bias() {
        let forest = Zone::new("f", "Forest").with_type("forest");
        let mut rng = FixedRandom::new(0.1);
        assert_eq!(select_anomaly_kind(&forest, &mut rng), AnomalyKind::Gravitational);
        let mut rng = FixedRandom::new(0.99);
        assert_eq!(select_anomaly_kind(&forest, &mut rng), AnomalyKind::Electric);
    }

    #[test]
    fn test_weather_roll() {
        let mut rng = FixedRandom::new(0.0);
        assert_eq!(select_weather(&mut rng), WeatherKind::Clear);
        let mut rng = FixedRandom::new(0.97);
        assert_eq!(select_weather(&mut rng), WeatherKind::Emission);
    }

    proptest! {
        #[test]
        fn prop_selection_is_pure(
            weights in prop::collection::vec(0.0f64..10.0, 1..16),
            draw in 0.0f64..1.0,
        ) {
            let indices: Vec<usize> = (0..weights.len()).collect();
            let mut a = FixedRandom::new(draw);
            let mut b = FixedRandom::new(draw);
            let first = select_weighted(&indices, |i| weights[*i], &mut a);
            let second = select_weighted(&indices, |i| weights[*i], &mut b);
            prop_assert_eq!(first, second);
            prop_assert!(first.is_some());
        }
    }
}
