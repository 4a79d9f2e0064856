use serde::Serialize;

/// Nouakchott neighborhoods used for suggestion lookups. Coordinates are
/// approximate district centers.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct Neighborhood {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub display_name: &'static str,
}

pub const NOUAKCHOTT_NEIGHBORHOODS: [Neighborhood; 10] = [
    Neighborhood {
        name: "Tevragh Zeina",
        lat: 18.086,
        lng: -15.975,
        display_name: "Tevragh Zeina, Nouakchott",
    },
    Neighborhood {
        name: "Arafat",
        lat: 18.045,
        lng: -15.970,
        display_name: "Arafat, Nouakchott",
    },
    Neighborhood {
        name: "El Mina",
        lat: 18.095,
        lng: -15.980,
        display_name: "El Mina, Nouakchott",
    },
    Neighborhood {
        name: "Ksar",
        lat: 18.080,
        lng: -15.965,
        display_name: "Ksar, Nouakchott",
    },
    Neighborhood {
        name: "Teyarett",
        lat: 18.070,
        lng: -15.960,
        display_name: "Teyarett, Nouakchott",
    },
    Neighborhood {
        name: "Toujounine",
        lat: 18.055,
        lng: -15.975,
        display_name: "Toujounine, Nouakchott",
    },
    Neighborhood {
        name: "Sebkha",
        lat: 18.040,
        lng: -15.985,
        display_name: "Sebkha, Nouakchott",
    },
    Neighborhood {
        name: "Dar Naim",
        lat: 18.100,
        lng: -15.955,
        display_name: "Dar Naim, Nouakchott",
    },
    Neighborhood {
        name: "Riyadh",
        lat: 18.090,
        lng: -15.950,
        display_name: "Riyadh, Nouakchott",
    },
    Neighborhood {
        name: "Tevragh Zeina Ouest",
        lat: 18.085,
        lng: -15.990,
        display_name: "Tevragh Zeina Ouest, Nouakchott",
    },
];

/// Fuzzy neighborhood match; queries shorter than 2 characters yield
/// nothing.
pub fn search_neighborhoods(query: &str) -> Vec<Neighborhood> {
    let query = query.trim();
    if query.chars().count() < 2 {
        return Vec::new();
    }

    let needle = query.to_lowercase();

    NOUAKCHOTT_NEIGHBORHOODS
        .iter()
        .filter(|n| {
            n.name.to_lowercase().contains(&needle)
                || n.display_name.to_lowercase().contains(&needle)
        })
        .copied()
        .collect()
}

/// Exact (case-insensitive) neighborhood lookup.
pub fn get_neighborhood_by_name(name: &str) -> Option<Neighborhood> {
    NOUAKCHOTT_NEIGHBORHOODS
        .iter()
        .find(|n| {
            n.name.eq_ignore_ascii_case(name) || n.display_name.eq_ignore_ascii_case(name)
        })
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_queries_yield_nothing() {
        assert!(search_neighborhoods("").is_empty());
        assert!(search_neighborhoods("t").is_empty());
    }

    #[test]
    fn fuzzy_match_is_case_insensitive() {
        let results = search_neighborhoods("tevragh");
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|n| n.name.starts_with("Tevragh")));
    }

    #[test]
    fn exact_lookup_accepts_display_name() {
        let ksar = get_neighborhood_by_name("ksar").unwrap();
        assert_eq!(ksar.name, "Ksar");

        let sebkha = get_neighborhood_by_name("Sebkha, Nouakchott").unwrap();
        assert_eq!(sebkha.name, "Sebkha");

        assert!(get_neighborhood_by_name("Atlantis").is_none());
    }
}
